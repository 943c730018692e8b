use apilevel_core::ceiling::MaxApiLevel;

#[derive(MaxApiLevel)]
struct Unversioned;

fn main() {
    let _ = Unversioned;
}
