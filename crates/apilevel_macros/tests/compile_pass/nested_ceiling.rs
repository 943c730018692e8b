use apilevel_core::ceiling::MaxApiLevel;

/// A dotted ceiling keeps every segment.
#[derive(Default, MaxApiLevel)]
#[api_level(max = "4.3")]
struct Scout43Api;

fn main() {
    assert_eq!(Scout43Api::MAX_API_LEVEL, &[4, 3]);
}
