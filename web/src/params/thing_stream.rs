use std::collections::HashSet;

use serde::Deserialize;
use utoipa::IntoParams;

use domain::error::Error;
use domain::{FieldSelector, ThingId};

/// Query parameters accepted by the things stream endpoint. All of them are
/// optional; an unparameterized stream delivers every change event in full.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub(crate) struct ThingStreamParams {
    /// Comma-separated field paths to project into each emitted view,
    /// e.g. `attributes/color,features`
    pub(crate) fields: Option<String>,
    /// Comma-separated thing ids to stream changes for; absent means all things
    pub(crate) ids: Option<String>,
    /// Backend filter expression, e.g. `eq(attributes/on,true)`
    pub(crate) filter: Option<String>,
}

impl ThingStreamParams {
    /// Parses `fields` into a selector, `Ok(None)` when the parameter is
    /// absent.
    pub(crate) fn field_selector(&self) -> Result<Option<FieldSelector>, Error> {
        self.fields.as_deref().map(FieldSelector::parse).transpose()
    }

    /// Splits `ids` into an allowlist, `None` when the parameter is absent.
    /// A present but blank list yields an empty set, which matches nothing.
    pub(crate) fn id_allowlist(&self) -> Option<HashSet<ThingId>> {
        self.ids.as_ref().map(|ids| {
            ids.split(',')
                .map(str::trim)
                .filter(|id| !id.is_empty())
                .map(ThingId::from)
                .collect()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_parameters_parse_to_nothing() {
        let params = ThingStreamParams::default();

        assert!(params.field_selector().unwrap().is_none());
        assert!(params.id_allowlist().is_none());
        assert!(params.filter.is_none());
    }

    #[test]
    fn ids_are_split_trimmed_and_deduplicated() {
        let params = ThingStreamParams {
            ids: Some(" demo:a , demo:b ,,demo:a".to_string()),
            ..Default::default()
        };

        let allowlist = params.id_allowlist().unwrap();
        assert_eq!(allowlist.len(), 2);
        assert!(allowlist.contains(&ThingId::from("demo:a")));
        assert!(allowlist.contains(&ThingId::from("demo:b")));
    }

    #[test]
    fn a_blank_ids_parameter_matches_nothing() {
        let params = ThingStreamParams {
            ids: Some("  ".to_string()),
            ..Default::default()
        };

        assert!(params.id_allowlist().unwrap().is_empty());
    }

    #[test]
    fn fields_parse_into_a_selector() {
        let params = ThingStreamParams {
            fields: Some("attributes/color,features".to_string()),
            ..Default::default()
        };

        let selector = params.field_selector().unwrap().unwrap();
        assert_eq!(selector.paths().len(), 2);
    }

    #[test]
    fn malformed_fields_are_an_error() {
        let params = ThingStreamParams {
            fields: Some("attributes//color".to_string()),
            ..Default::default()
        };

        assert!(params.field_selector().is_err());
    }
}
