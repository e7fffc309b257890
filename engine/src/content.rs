use std::collections::HashMap;

/// Sample actor records, keyed by file name without extension.
pub fn builtin_actors() -> HashMap<&'static str, &'static str> {
    HashMap::from([
        ("nurhael", include_str!("../content/actors/nurhael.json")),
        ("cave_troll", include_str!("../content/actors/cave_troll.json")),
    ])
}

pub fn builtin_tooltips() -> &'static str {
    include_str!("../content/tooltips.json")
}
