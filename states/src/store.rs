//! The generic CRUD resource store.
//!
//! One `ResourceStore<R>` instance owns a single entity type's paginated
//! list, selected record, form buffer, and dialog lifecycle. All IO goes
//! through the injected [`ResourceService`]; the notification sink,
//! clock, and id generator are injected as well so behavior is
//! deterministic under test.
//!
//! Loading flags are advisory, UI-facing state. They are cleared on both
//! the success and the failure path of every action. Actions take
//! `&mut self`, so two actions on the same store cannot interleave: a
//! stale in-flight fetch structurally cannot overwrite a newer result.

use std::sync::Arc;

use backoffice_services::{
    Clock, IdGenerator, NotificationKind, NotificationSink, ResourceService,
};
use log::warn;

use crate::{PageQuery, PaginatedView, Resource, StoreError, filter_records, paginate};

/// What the dialog is open for; drives form pre-population and submit
/// behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DialogMode {
    #[default]
    Create,
    Edit,
    View,
}

/// State container for one entity type's list, form, and dialog.
pub struct ResourceStore<R: Resource> {
    service: Arc<dyn ResourceService<R>>,
    notifier: Arc<dyn NotificationSink>,
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdGenerator>,

    records: Vec<R>,
    view: PaginatedView<R>,
    query: PageQuery,
    selected: Option<R>,
    form: R::Form,

    dialog_visible: bool,
    dialog_mode: DialogMode,
    is_loading: bool,
    is_loading_submit: bool,
    is_loading_delete: bool,
}

impl<R: Resource> ResourceStore<R> {
    pub fn new(
        service: Arc<dyn ResourceService<R>>,
        notifier: Arc<dyn NotificationSink>,
        clock: Arc<dyn Clock>,
        ids: Arc<dyn IdGenerator>,
    ) -> Self {
        Self {
            service,
            notifier,
            clock,
            ids,
            records: Vec::new(),
            view: PaginatedView::default(),
            query: PageQuery::default(),
            selected: None,
            form: R::Form::default(),
            dialog_visible: false,
            dialog_mode: DialogMode::default(),
            is_loading: false,
            is_loading_submit: false,
            is_loading_delete: false,
        }
    }

    /// Reloads the working set and recomputes the paginated view from
    /// the current query.
    ///
    /// Always starts over from the full backing set; nothing is reused
    /// from a previous fetch. The loading flag clears whether the
    /// service call succeeds or fails.
    pub async fn fetch(&mut self) -> Result<(), StoreError> {
        self.is_loading = true;
        let result = self.load_view().await;
        self.is_loading = false;

        if let Err(err) = &result {
            warn!("{} fetch failed: {err}", R::LABEL);
            self.notifier.notify(
                &format!("Could not load {} list: {err}", label(R::LABEL)),
                NotificationKind::Error,
            );
        }
        result
    }

    /// Installs `query`, then fetches.
    pub async fn fetch_with(&mut self, query: PageQuery) -> Result<(), StoreError> {
        self.query = query;
        self.fetch().await
    }

    async fn load_view(&mut self) -> Result<(), StoreError> {
        let all = self.service.list().await?;
        let filtered = filter_records(&all, &self.query.search);
        self.view = paginate(&filtered, &self.query);
        self.records = filtered;
        Ok(())
    }

    /// Validates the form, creates a record with a fresh id, and
    /// refreshes the view.
    ///
    /// On success the dialog closes and the form resets before the
    /// refresh. On validation or service failure the dialog stays open
    /// and the form buffer is untouched; the error is surfaced and
    /// returned. `is_loading_submit` clears on every path.
    pub async fn create(&mut self) -> Result<(), StoreError> {
        self.is_loading_submit = true;
        let result = self.submit_create().await;
        self.is_loading_submit = false;
        result
    }

    async fn submit_create(&mut self) -> Result<(), StoreError> {
        if let Err(err) = R::validate(&self.form) {
            self.notifier
                .notify(&err.to_string(), NotificationKind::Error);
            return Err(err.into());
        }

        let record = R::from_form(&self.form, self.ids.generate(), self.clock.now());
        if let Err(err) = self.service.create(record).await {
            self.notifier.notify(
                &format!("Could not create {}: {err}", label(R::LABEL)),
                NotificationKind::Error,
            );
            return Err(err.into());
        }

        self.notifier
            .notify(&format!("{} created", R::LABEL), NotificationKind::Success);
        self.dialog_visible = false;
        self.reset_form();
        self.fetch().await
    }

    /// Merges the form over the selected record and refreshes.
    ///
    /// Without a selected record this is a no-op: no state change, no
    /// service call. Success and failure semantics otherwise match
    /// [`create`](Self::create).
    pub async fn update(&mut self) -> Result<(), StoreError> {
        if self.selected.is_none() {
            return Ok(());
        }

        self.is_loading_submit = true;
        let result = self.submit_update().await;
        self.is_loading_submit = false;
        result
    }

    async fn submit_update(&mut self) -> Result<(), StoreError> {
        let Some(mut merged) = self.selected.clone() else {
            return Ok(());
        };
        merged.apply_form(&self.form, self.clock.now());
        let id = merged.id().to_string();

        if let Err(err) = self.service.update(&id, merged).await {
            self.notifier.notify(
                &format!("Could not update {}: {err}", label(R::LABEL)),
                NotificationKind::Error,
            );
            return Err(err.into());
        }

        self.notifier
            .notify(&format!("{} updated", R::LABEL), NotificationKind::Success);
        self.dialog_visible = false;
        self.reset_form();
        self.fetch().await
    }

    /// Removes the record with `id` and refreshes. Deleting an id that
    /// is no longer present is a silent no-op, not an error.
    pub async fn delete(&mut self, id: &str) -> Result<(), StoreError> {
        self.is_loading_delete = true;
        let result = self.submit_delete(id).await;
        self.is_loading_delete = false;
        result
    }

    async fn submit_delete(&mut self, id: &str) -> Result<(), StoreError> {
        if let Err(err) = self.service.delete(id).await {
            self.notifier.notify(
                &format!("Could not delete {}: {err}", label(R::LABEL)),
                NotificationKind::Error,
            );
            return Err(err.into());
        }

        self.notifier
            .notify(&format!("{} deleted", R::LABEL), NotificationKind::Success);
        self.fetch().await
    }

    /// Opens the dialog. With a record, the selected slot and the form
    /// are populated from it (field-by-field copy, never aliasing);
    /// without one, the form resets to entity defaults.
    pub fn open_dialog(&mut self, mode: DialogMode, record: Option<&R>) {
        self.dialog_mode = mode;
        match record {
            Some(record) => {
                self.selected = Some(record.clone());
                self.form = record.to_form();
            }
            None => self.reset_form(),
        }
        self.dialog_visible = true;
    }

    pub fn close_dialog(&mut self) {
        self.dialog_visible = false;
        self.reset_form();
    }

    /// Returns the form to entity defaults and clears the selected
    /// record.
    pub fn reset_form(&mut self) {
        self.form = R::Form::default();
        self.selected = None;
    }

    pub fn view(&self) -> &PaginatedView<R> {
        &self.view
    }

    /// The filtered working set the current view was computed from.
    pub fn records(&self) -> &[R] {
        &self.records
    }

    pub fn selected(&self) -> Option<&R> {
        self.selected.as_ref()
    }

    pub fn form(&self) -> &R::Form {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut R::Form {
        &mut self.form
    }

    pub fn query(&self) -> &PageQuery {
        &self.query
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.query.search = search.into();
    }

    pub fn set_page(&mut self, page: usize) {
        self.query.page = page;
    }

    pub fn set_per_page(&mut self, per_page: usize) {
        self.query.per_page = per_page;
    }

    pub fn dialog_visible(&self) -> bool {
        self.dialog_visible
    }

    pub fn dialog_mode(&self) -> DialogMode {
        self.dialog_mode
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn is_loading_submit(&self) -> bool {
        self.is_loading_submit
    }

    pub fn is_loading_delete(&self) -> bool {
        self.is_loading_delete
    }
}

fn label(name: &str) -> String {
    name.to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use backoffice_services::{
        ChannelNotifier, InMemoryRepository, Latency, ManualClock, Notification, Record,
        SequentialIds, ServiceError,
    };
    use chrono::{DateTime, TimeZone, Utc};

    use crate::FormError;

    #[derive(Debug, Clone, PartialEq, Eq)]
    struct Gadget {
        id: String,
        name: String,
        code: String,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    }

    #[derive(Debug, Clone, Default, PartialEq, Eq)]
    struct GadgetForm {
        name: String,
        code: String,
    }

    impl Record for Gadget {
        fn id(&self) -> &str {
            &self.id
        }
    }

    impl Resource for Gadget {
        type Form = GadgetForm;
        const LABEL: &'static str = "Gadget";

        fn search_text(&self) -> Vec<&str> {
            vec![&self.name, &self.code]
        }

        fn validate(form: &Self::Form) -> Result<(), FormError> {
            if form.name.is_empty() {
                return Err(FormError::required("name"));
            }
            Ok(())
        }

        fn from_form(form: &Self::Form, id: String, now: DateTime<Utc>) -> Self {
            Self {
                id,
                name: form.name.clone(),
                code: form.code.clone(),
                created_at: now,
                updated_at: now,
            }
        }

        fn apply_form(&mut self, form: &Self::Form, now: DateTime<Utc>) {
            self.name = form.name.clone();
            self.code = form.code.clone();
            self.updated_at = now;
        }

        fn to_form(&self) -> Self::Form {
            GadgetForm {
                name: self.name.clone(),
                code: self.code.clone(),
            }
        }
    }

    fn gadget(id: &str, name: &str) -> Gadget {
        let t = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        Gadget {
            id: id.to_string(),
            name: name.to_string(),
            code: name.to_uppercase(),
            created_at: t,
            updated_at: t,
        }
    }

    struct Fixture {
        store: ResourceStore<Gadget>,
        repo: Arc<InMemoryRepository<Gadget>>,
        notifications: flume::Receiver<Notification>,
    }

    fn fixture(seed: Vec<Gadget>) -> Fixture {
        let repo = Arc::new(InMemoryRepository::new(seed).with_latency(Latency::none()));
        let (notifier, notifications) = ChannelNotifier::unbounded();
        let clock = Arc::new(ManualClock::starting_at(
            Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap(),
        ));
        let store = ResourceStore::new(
            repo.clone(),
            Arc::new(notifier),
            clock,
            Arc::new(SequentialIds::new("gadget")),
        );
        Fixture {
            store,
            repo,
            notifications,
        }
    }

    /// A service the store must never reach; any call is a test failure.
    #[derive(Debug)]
    struct UnreachableService;

    #[async_trait::async_trait]
    impl backoffice_services::ResourceService<Gadget> for UnreachableService {
        async fn list(&self) -> Result<Vec<Gadget>, ServiceError> {
            panic!("unexpected list call");
        }
        async fn create(&self, _record: Gadget) -> Result<Gadget, ServiceError> {
            panic!("unexpected create call");
        }
        async fn update(&self, _id: &str, _record: Gadget) -> Result<Gadget, ServiceError> {
            panic!("unexpected update call");
        }
        async fn delete(&self, _id: &str) -> Result<(), ServiceError> {
            panic!("unexpected delete call");
        }
    }

    #[tokio::test]
    async fn fetch_filters_then_paginates() {
        let seed: Vec<Gadget> = (1..=25).map(|i| gadget(&format!("g-{i}"), &format!("Gadget {i}"))).collect();
        let mut f = fixture(seed);

        f.store.set_per_page(10);
        f.store.set_page(3);
        f.store.fetch().await.expect("fetch");

        let view = f.store.view();
        assert_eq!(view.items.len(), 5);
        assert_eq!(view.from, 21);
        assert_eq!(view.to, 25);
        assert_eq!(view.last_page, 3);
        assert!(!f.store.is_loading());

        f.store.set_search("gadget 2");
        f.store.set_page(1);
        f.store.fetch().await.expect("fetch");
        // "Gadget 2" plus "Gadget 20".."Gadget 25".
        assert_eq!(f.store.view().total, 7);
        assert_eq!(f.store.records().len(), 7);
    }

    #[tokio::test]
    async fn create_generates_id_closes_dialog_and_refreshes() {
        let mut f = fixture(vec![gadget("g-1", "Widget")]);
        f.store.fetch().await.expect("fetch");

        f.store.open_dialog(DialogMode::Create, None);
        f.store.form_mut().name = "Sprocket".to_string();
        f.store.create().await.expect("create");

        assert!(!f.store.dialog_visible());
        assert_eq!(*f.store.form(), GadgetForm::default());
        assert!(!f.store.is_loading_submit());

        let created: Vec<_> = f
            .repo
            .snapshot()
            .into_iter()
            .filter(|g| g.name == "Sprocket")
            .collect();
        assert_eq!(created.len(), 1);
        assert_eq!(created[0].id, "gadget-1");
        assert_eq!(f.store.view().total, 2);

        let first = f.notifications.try_recv().expect("success notification");
        assert_eq!(first.message, "Gadget created");
        assert_eq!(first.kind, NotificationKind::Success);
    }

    #[tokio::test]
    async fn create_with_missing_required_field_keeps_dialog_open() {
        let mut f = fixture(vec![]);
        f.store.open_dialog(DialogMode::Create, None);
        f.store.form_mut().code = "X1".to_string();

        let err = f.store.create().await.expect_err("validation failure");
        assert_eq!(err, StoreError::Validation(FormError::required("name")));

        assert!(f.store.dialog_visible());
        assert_eq!(f.store.form().code, "X1");
        assert!(!f.store.is_loading_submit());
        assert_eq!(f.repo.len(), 0);

        let note = f.notifications.try_recv().expect("error notification");
        assert_eq!(note.message, "name is required");
        assert_eq!(note.kind, NotificationKind::Error);
    }

    #[tokio::test]
    async fn create_service_failure_leaves_form_and_clears_flag() {
        let mut f = fixture(vec![]);
        f.store.open_dialog(DialogMode::Create, None);
        f.store.form_mut().name = "Doomed".to_string();
        f.repo.fail_next(ServiceError::unavailable("backend down"));

        let err = f.store.create().await.expect_err("service failure");
        assert!(matches!(err, StoreError::Service(_)));

        assert!(f.store.dialog_visible());
        assert_eq!(f.store.form().name, "Doomed");
        assert!(!f.store.is_loading_submit());
        assert_eq!(f.repo.len(), 0);
    }

    #[tokio::test]
    async fn update_merges_form_and_preserves_created_at() {
        let original = gadget("g-1", "Widget");
        let created_at = original.created_at;
        let mut f = fixture(vec![original.clone()]);
        f.store.fetch().await.expect("fetch");

        f.store.open_dialog(DialogMode::Edit, Some(&original));
        f.store.form_mut().name = "Widget v2".to_string();
        f.store.update().await.expect("update");

        let stored = &f.repo.snapshot()[0];
        assert_eq!(stored.name, "Widget v2");
        assert_eq!(stored.created_at, created_at);
        assert!(stored.updated_at > created_at);
        assert!(!f.store.dialog_visible());
        assert!(f.store.selected().is_none());
    }

    #[tokio::test]
    async fn update_without_selection_is_a_noop_with_no_service_call() {
        let (notifier, _rx) = ChannelNotifier::unbounded();
        let mut store: ResourceStore<Gadget> = ResourceStore::new(
            Arc::new(UnreachableService),
            Arc::new(notifier),
            Arc::new(ManualClock::starting_at(Utc::now())),
            Arc::new(SequentialIds::new("gadget")),
        );

        store.update().await.expect("no-op");
        assert!(!store.is_loading_submit());
    }

    #[tokio::test]
    async fn delete_missing_id_is_silent_and_leaves_length() {
        let mut f = fixture(vec![gadget("g-1", "Widget")]);
        f.store.delete("ghost").await.expect("silent no-op");
        assert_eq!(f.repo.len(), 1);
        assert!(!f.store.is_loading_delete());
    }

    #[tokio::test]
    async fn delete_removes_and_refreshes() {
        let mut f = fixture(vec![gadget("g-1", "Widget"), gadget("g-2", "Sprocket")]);
        f.store.fetch().await.expect("fetch");

        f.store.delete("g-1").await.expect("delete");
        assert_eq!(f.repo.len(), 1);
        assert_eq!(f.store.view().total, 1);
        assert_eq!(f.store.view().items[0].id, "g-2");
    }

    #[tokio::test]
    async fn fetch_failure_clears_loading_and_notifies() {
        let mut f = fixture(vec![]);
        f.repo.fail_next(ServiceError::unavailable("backend down"));

        let err = f.store.fetch().await.expect_err("failure");
        assert!(matches!(err, StoreError::Service(_)));
        assert!(!f.store.is_loading());

        let note = f.notifications.try_recv().expect("error notification");
        assert_eq!(note.kind, NotificationKind::Error);
        assert!(note.message.contains("backend down"));
    }

    #[tokio::test]
    async fn form_buffer_never_aliases_the_selected_record() {
        let original = gadget("g-1", "Widget");
        let mut f = fixture(vec![original.clone()]);
        f.store.fetch().await.expect("fetch");

        f.store.open_dialog(DialogMode::Edit, Some(&original));
        f.store.form_mut().name = "Scratch".to_string();

        // Editing the form must not touch the list or the selected copy.
        assert_eq!(f.store.records()[0].name, "Widget");
        assert_eq!(f.store.selected().expect("selected").name, "Widget");
        assert_eq!(f.repo.snapshot()[0].name, "Widget");
    }

    #[tokio::test]
    async fn close_dialog_resets_everything() {
        let original = gadget("g-1", "Widget");
        let mut f = fixture(vec![original.clone()]);

        f.store.open_dialog(DialogMode::View, Some(&original));
        assert!(f.store.dialog_visible());
        assert_eq!(f.store.dialog_mode(), DialogMode::View);
        assert_eq!(f.store.form().name, "Widget");

        f.store.close_dialog();
        assert!(!f.store.dialog_visible());
        assert!(f.store.selected().is_none());
        assert_eq!(*f.store.form(), GadgetForm::default());
    }
}
