use std::collections::BTreeMap;

/// Free-form display attributes passed through to every `EventInstance`.
/// Ordered so that serialized instances are stable between expansions.
pub type Metadata = BTreeMap<String, String>;
