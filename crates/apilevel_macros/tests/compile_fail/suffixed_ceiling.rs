use apilevel_core::ceiling::MaxApiLevel;

#[derive(MaxApiLevel)]
#[api_level(max = "4.3-SNAPSHOT")]
struct Scout43Snapshot;

fn main() {
    let _ = Scout43Snapshot;
}
