//! Environment source: `UPDELTA_<SECTION>__<KEY>`, e.g.
//! `UPDELTA_SCANNER__PARALLEL_HASHING=false` or
//! `UPDELTA_BLACKLIST__EXTENSIONS=.pdb,.log`.

use config::builder::DefaultState;
use config::ConfigBuilder;
use config::Environment;

pub const ENV_PREFIX: &str = "UPDELTA";

/// Keys whose values are comma-separated lists.
const LIST_KEYS: &[&str] = &[
    "blacklist.files",
    "blacklist.extensions",
    "blacklist.skip_directories",
];

pub fn add_to_builder(builder: ConfigBuilder<DefaultState>) -> ConfigBuilder<DefaultState> {
    let source = LIST_KEYS.iter().fold(
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
            .list_separator(","),
        |env, key| env.with_list_parse_key(key),
    );
    builder.add_source(source)
}
