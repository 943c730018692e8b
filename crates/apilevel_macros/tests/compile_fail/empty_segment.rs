use apilevel_core::ceiling::MaxApiLevel;

#[derive(MaxApiLevel)]
#[api_level(max = "4..3")]
struct ScoutGap;

fn main() {
    let _ = ScoutGap;
}
