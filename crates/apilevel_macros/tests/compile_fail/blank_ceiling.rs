use apilevel_core::ceiling::MaxApiLevel;

#[derive(MaxApiLevel)]
#[api_level(max = "")]
struct Blank;

fn main() {
    let _ = Blank;
}
