use backoffice_services::Record;
use chrono::{DateTime, Utc};

use crate::FormError;

/// Entity hooks that turn the generic [`ResourceStore`] into a concrete
/// one.
///
/// Each admin resource implements this once; the store itself is never
/// copied per entity. The form type is the record's editable subset with
/// copy semantics: projecting a record into a form and editing the form
/// must not touch the record until submit.
///
/// [`ResourceStore`]: crate::ResourceStore
pub trait Resource: Record {
    /// The editable subset of the record, with entity defaults.
    type Form: Clone + Default + Send + Sync + 'static;

    /// Singular display name used in notifications.
    const LABEL: &'static str;

    /// Text fields the search filter matches against.
    fn search_text(&self) -> Vec<&str>;

    /// Entity-specific required-field check, applied before create.
    fn validate(form: &Self::Form) -> Result<(), FormError>;

    /// Builds a new record from the form with a generated id and the
    /// current time.
    fn from_form(form: &Self::Form, id: String, now: DateTime<Utc>) -> Self;

    /// Merges form fields over an existing record, preserving whatever
    /// the form does not carry (the creation timestamp in particular)
    /// and stamping the update time.
    fn apply_form(&mut self, form: &Self::Form, now: DateTime<Utc>);

    /// Field-by-field projection into a form buffer; never aliases the
    /// record.
    fn to_form(&self) -> Self::Form;
}
