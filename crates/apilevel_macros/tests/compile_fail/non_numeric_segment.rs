use apilevel_core::ceiling::MaxApiLevel;

#[derive(MaxApiLevel)]
#[api_level(max = "4.x")]
struct ScoutWildcard;

fn main() {
    let _ = ScoutWildcard;
}
