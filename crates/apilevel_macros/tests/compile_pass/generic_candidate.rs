use core::marker::PhantomData;

use apilevel_core::ceiling::{Candidate, MaxApiLevel};

/// Generic candidates get a generic impl.
#[derive(MaxApiLevel)]
#[api_level(max = "11")]
struct Delegating<T: Send + Sync + 'static> {
    _inner: PhantomData<T>,
}

impl<T: Send + Sync + 'static> Default for Delegating<T> {
    fn default() -> Self {
        Self { _inner: PhantomData }
    }
}

fn main() {
    assert_eq!(<Delegating<u8> as MaxApiLevel>::MAX_API_LEVEL, &[11]);

    let candidate = Candidate::of::<Delegating<u8>>().build();
    assert_eq!(candidate.ceiling().map(ToString::to_string).as_deref(), Some("11"));
}
