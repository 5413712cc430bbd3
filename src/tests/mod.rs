mod fixtures;

mod ability;
mod json;
mod render;

/// Test if rocket can be built
#[test]
fn test_rocket() {
    use crate::{build_rocket, config::Config};

    let _rocket = build_rocket(Config::default());
    // no panic = success
}
