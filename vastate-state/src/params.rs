//! Request parameter sets derived from field classification.
//!
//! The same state serves create, read, update and delete, and a remote
//! entity can be found by different identifying attributes depending on
//! what the caller has populated. [`EntityState::search_params`] tries them
//! in a fixed order.

use crate::filter::{FieldFilter, FieldSet, FilterCombination};
use crate::{EntityState, StateResult};
use tracing::debug;
use vastate_types::{Record, lower, update_record};

/// Identifying fields most remote entities accept as lookup parameters.
pub const COMMON_SEARCHABLE_FIELDS: &[&str] = &[
    "name",
    "path",
    "tenant_id",
    "tenant_name",
    "bucket",
    "gid",
    "uid",
];

/// Top-level unique identifiers, added whenever Known.
const IDENTIFIER_FIELDS: &[&str] = &["id", "guid"];

impl EntityState {
    /// Lookup parameters for finding this entity remotely.
    ///
    /// 1. Known common searchable fields that are required, optional or searchable.
    /// 2. Otherwise every Known required or searchable field, minus edit-only
    ///    and delete-only fields.
    /// 3. Known `id` and `guid` are always added.
    /// 4. Read-only fields are merged in without overwriting.
    /// 5. Still empty: every Known optional primitive field.
    pub fn search_params(&self) -> StateResult<Record> {
        let entity = self.entity()?;
        let exclude = entity.hints().edit_or_delete_only();

        let common = self.get_filtered_values(
            FilterCombination::Or,
            Some(&FieldSet::include(COMMON_SEARCHABLE_FIELDS.iter().copied())),
            &[
                FieldFilter::Required,
                FieldFilter::Optional,
                FieldFilter::Searchable,
            ],
        )?;

        let mut params = if !common.is_empty() {
            debug!("search params for {:?}: common searchable fields", entity.name());
            common
        } else {
            let required = self.get_filtered_values(
                FilterCombination::Or,
                Some(&FieldSet::exclude(exclude)),
                &[FieldFilter::Required, FieldFilter::Searchable],
            )?;
            if !required.is_empty() {
                debug!("search params for {:?}: required+searchable", entity.name());
            }
            required
        };

        for key in IDENTIFIER_FIELDS {
            if let Some(value) = self.values().get(*key).filter(|v| v.is_known()) {
                debug!("search params for {:?}: by {}", entity.name(), key);
                params.insert((*key).to_string(), lower(value));
            }
        }

        update_record(&mut params, self.read_only_search_params()?, false);

        if params.is_empty() {
            debug!("search params for {:?}: all optional primitive fields", entity.name());
            params = self.get_filtered_values(
                FilterCombination::Or,
                None,
                &[FieldFilter::Optional, FieldFilter::PrimitivesOnly],
            )?;
        }
        Ok(params)
    }

    /// Known read-only fields.
    pub fn read_only_search_params(&self) -> StateResult<Record> {
        self.get_filtered_values(FilterCombination::Or, None, &[FieldFilter::ReadOnly])
    }

    /// Known optional fields listed as edit-only, sent only on update.
    pub fn edit_only_params(&self) -> StateResult<Record> {
        let fields = &self.entity()?.hints().edit_only_fields;
        self.hinted_optional_params(fields)
    }

    /// Known optional fields listed as delete-only, sent only on delete.
    pub fn delete_only_params(&self) -> StateResult<Record> {
        let fields = &self.entity()?.hints().delete_only_fields;
        self.hinted_optional_params(fields)
    }

    /// Known required and optional fields for a create request. Edit-only,
    /// delete-only fields and `id` are left out.
    pub fn create_params(&self) -> StateResult<Record> {
        let exclude = self.entity()?.hints().edit_or_delete_only();
        let mut params = self.get_filtered_values(
            FilterCombination::Or,
            Some(&FieldSet::exclude(exclude)),
            &[FieldFilter::Required, FieldFilter::Optional],
        )?;
        params.remove("id");
        Ok(params)
    }

    fn hinted_optional_params(&self, fields: &[String]) -> StateResult<Record> {
        if fields.is_empty() {
            return Ok(Record::new());
        }
        self.get_filtered_values(
            FilterCombination::Or,
            Some(&FieldSet::include(fields.iter().cloned())),
            &[FieldFilter::Optional],
        )
    }
}
