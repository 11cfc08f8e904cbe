use fogis_lib::types::EVENT_TYPES;

use crate::output::{print_event_types_table, print_json, OutputFormat};

pub fn run(format: &OutputFormat) {
    match format {
        OutputFormat::Table => print_event_types_table(EVENT_TYPES),
        OutputFormat::Json => print_json(&EVENT_TYPES),
    }
}
