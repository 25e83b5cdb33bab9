//! Cached per-entity collections with `{data, loading, error}` state.
//!
//! A store owns the last fetched collection of one entity type, decides
//! whether pages are fetched from the server or sliced locally, and applies
//! successful mutations to its cache. Failures never escape an action: they
//! end up in `error` for the caller to surface.

use std::sync::{Mutex, MutexGuard, RwLock, RwLockReadGuard, RwLockWriteGuard};

use domain::models::page::Page;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::{
    api_client::ApiError,
    pagination::{ClientPager, Pager, Pagination, ServerPager},
    resource::Resource,
};

#[derive(Debug, Clone, PartialEq)]
pub struct StoreSnapshot<T> {
    pub data: Vec<T>,
    pub loading: bool,
    pub error: Option<String>,
    pub page: u32,
    pub total_pages: u32,
}

#[derive(Debug)]
struct StoreState<T> {
    data: Vec<T>,
    loading: bool,
    error: Option<String>,
    pager: Pager,
}

pub struct EntityStore<R: Resource> {
    resource: R,
    state: RwLock<StoreState<R::Item>>,
    /// Token of the list fetch whose result is still wanted.
    inflight: Mutex<Option<CancellationToken>>,
    shutdown: CancellationToken,
    revision: watch::Sender<u64>,
}

impl<R: Resource> EntityStore<R> {
    /// `page_size` only applies to collections sliced locally.
    pub fn new(resource: R, page_size: usize) -> Self {
        let pager = if resource.kind().is_server_paged() {
            Pager::Server(ServerPager::default())
        } else {
            Pager::Client(ClientPager::new(0, page_size))
        };
        let (revision, _) = watch::channel(0);
        Self {
            resource,
            state: RwLock::new(StoreState {
                data: Vec::new(),
                loading: false,
                error: None,
                pager,
            }),
            inflight: Mutex::new(None),
            shutdown: CancellationToken::new(),
            revision,
        }
    }

    pub fn resource(&self) -> &R {
        &self.resource
    }

    pub fn snapshot(&self) -> StoreSnapshot<R::Item> {
        let state = self.read();
        StoreSnapshot {
            data: state.data.clone(),
            loading: state.loading,
            error: state.error.clone(),
            page: state.pager.current_page(),
            total_pages: state.pager.total_pages(),
        }
    }

    /// Everything currently cached: the whole collection for client-paged
    /// entities, the loaded page for server-paged ones.
    pub fn all(&self) -> Vec<R::Item> {
        self.read().data.clone()
    }

    /// Rows of the current page.
    pub fn page_rows(&self) -> Vec<R::Item> {
        let state = self.read();
        match &state.pager {
            Pager::Client(pager) => pager.slice(&state.data).to_vec(),
            Pager::Server(_) => state.data.clone(),
        }
    }

    pub fn pager(&self) -> Pager {
        self.read().pager.clone()
    }

    /// Bumped on every change to the cached data.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    pub fn revision(&self) -> u64 {
        *self.revision.borrow()
    }

    /// Reloads the collection (the current page for server-paged entities).
    /// Returns `false` when the fetch failed or was superseded.
    pub async fn refetch(&self) -> bool {
        let page = match &self.read().pager {
            Pager::Server(pager) => Some(pager.current_page()),
            Pager::Client(_) => None,
        };
        self.fetch_list(page).await
    }

    /// Jumps to `page`. Out-of-range pages are refused without any request;
    /// server-paged entities fetch the page, the rest are sliced locally.
    pub async fn set_page(&self, page: u32) -> bool {
        let server = {
            let mut state = self.write();
            if !state.pager.contains(page) {
                debug!(kind = %self.resource.kind(), page, "page out of range");
                return false;
            }
            match &mut state.pager {
                Pager::Server(_) => true,
                Pager::Client(pager) => {
                    pager.go_to(page);
                    false
                }
            }
        };
        if server {
            return self.fetch_list(Some(page)).await;
        }
        self.bump();
        true
    }

    pub async fn fetch_one(&self, id: i64) -> Option<R::Item> {
        let cancel = self.shutdown.child_token();
        self.write().loading = true;
        let result = self.resource.get(id, &cancel).await;
        if cancel.is_cancelled() {
            self.write().loading = false;
            return None;
        }
        let mut state = self.write();
        state.loading = false;
        match result {
            Ok(item) => Some(item),
            Err(e) => {
                self.record_error(&mut state, "fetch", e);
                None
            }
        }
    }

    pub async fn create(&self, form: &R::Form) -> Option<R::Item> {
        self.write().loading = true;
        let result = self.resource.create(form).await;
        let mut state = self.write();
        state.loading = false;
        match result {
            Ok(item) => {
                info!(kind = %self.resource.kind(), id = R::id_of(&item), "created");
                state.data.insert(0, item.clone());
                state.error = None;
                Self::count_changed(&mut state, 1);
                drop(state);
                self.bump();
                Some(item)
            }
            Err(e) => {
                self.record_error(&mut state, "create", e);
                None
            }
        }
    }

    pub async fn update(&self, id: i64, form: &R::Form) -> Option<R::Item> {
        self.write().loading = true;
        let result = self.resource.update(id, form).await;
        let mut state = self.write();
        state.loading = false;
        match result {
            Ok(item) => {
                info!(kind = %self.resource.kind(), id, "updated");
                if let Some(slot) = state.data.iter_mut().find(|cached| R::id_of(cached) == id) {
                    *slot = item.clone();
                }
                state.error = None;
                drop(state);
                self.bump();
                Some(item)
            }
            Err(e) => {
                self.record_error(&mut state, "update", e);
                None
            }
        }
    }

    pub async fn delete(&self, id: i64) -> bool {
        self.write().loading = true;
        let result = self.resource.delete(id).await;
        let mut state = self.write();
        state.loading = false;
        match result {
            Ok(()) => {
                info!(kind = %self.resource.kind(), id, "deleted");
                let before = state.data.len();
                state.data.retain(|cached| R::id_of(cached) != id);
                if state.data.len() < before {
                    Self::count_changed(&mut state, -1);
                }
                state.error = None;
                drop(state);
                self.bump();
                true
            }
            Err(e) => {
                self.record_error(&mut state, "delete", e);
                false
            }
        }
    }

    /// Cancels every in-flight fetch; their results are discarded.
    pub fn shutdown(&self) {
        self.shutdown.cancel();
    }

    async fn fetch_list(&self, page: Option<u32>) -> bool {
        let cancel = self.begin_list_fetch();
        let result = self.resource.list(page, &cancel).await;

        let mut inflight = lock(&self.inflight);
        if cancel.is_cancelled() {
            if self.shutdown.is_cancelled() {
                *inflight = None;
                self.write().loading = false;
            }
            debug!(kind = %self.resource.kind(), "discarding superseded fetch");
            return false;
        }
        *inflight = None;

        let mut state = self.write();
        state.loading = false;
        match result {
            Ok(page) => {
                Self::apply_page(&mut state, page);
                state.error = None;
                drop(state);
                drop(inflight);
                self.bump();
                true
            }
            Err(e) => {
                self.record_error(&mut state, "list", e);
                false
            }
        }
    }

    fn begin_list_fetch(&self) -> CancellationToken {
        let token = self.shutdown.child_token();
        let mut inflight = lock(&self.inflight);
        if let Some(previous) = inflight.replace(token.clone()) {
            previous.cancel();
        }
        self.write().loading = true;
        token
    }

    fn apply_page(state: &mut StoreState<R::Item>, page: Page<R::Item>) {
        match &mut state.pager {
            Pager::Server(pager) => pager.update(&page),
            Pager::Client(pager) => pager.set_total_items(page.data.len()),
        }
        state.data = page.data;
    }

    fn count_changed(state: &mut StoreState<R::Item>, delta: i64) {
        let len = state.data.len();
        match &mut state.pager {
            Pager::Server(pager) => pager.adjust_total(delta),
            Pager::Client(pager) => pager.set_total_items(len),
        }
    }

    fn record_error(&self, state: &mut StoreState<R::Item>, action: &str, error: ApiError) {
        warn!(kind = %self.resource.kind(), action, error = %error, "store action failed");
        state.error = Some(error.to_string());
    }

    fn bump(&self) {
        self.revision.send_modify(|revision| *revision += 1);
    }

    fn read(&self) -> RwLockReadGuard<'_, StoreState<R::Item>> {
        self.state
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, StoreState<R::Item>> {
        self.state
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[cfg(test)]
mod tests {
    use std::sync::{
        Arc,
        atomic::{AtomicBool, AtomicUsize, Ordering},
    };

    use async_trait::async_trait;
    use domain::models::{EntityKind, cliente::Cliente};
    use tokio::sync::Notify;

    use super::*;
    use crate::services::{
        forms::ClienteForm,
        validation::{FormMode, Validate},
    };

    fn cliente(id: i64, name: &str) -> Cliente {
        Cliente {
            id,
            name: name.to_string(),
            celular: Some("987654321".to_string()),
            email: Some(format!("{}@yuntas.pe", name.to_lowercase())),
            producto_id: None,
            created_at: None,
        }
    }

    fn form(name: &str) -> ClienteForm {
        ClienteForm {
            name: name.to_string(),
            celular: "987654321".to_string(),
            email: "nuevo@yuntas.pe".to_string(),
            producto_id: None,
        }
    }

    struct FakeResource {
        kind: EntityKind,
        items: Mutex<Vec<Cliente>>,
        fail_mutations: AtomicBool,
        list_calls: AtomicUsize,
        /// When set, the first list call parks until notified.
        gate: Option<(Arc<Notify>, Arc<Notify>)>,
        /// Same for every `get` call.
        get_gate: Option<(Arc<Notify>, Arc<Notify>)>,
    }

    impl FakeResource {
        fn new(kind: EntityKind, items: Vec<Cliente>) -> Self {
            Self {
                kind,
                items: Mutex::new(items),
                fail_mutations: AtomicBool::new(false),
                list_calls: AtomicUsize::new(0),
                gate: None,
                get_gate: None,
            }
        }
    }

    #[async_trait]
    impl Resource for FakeResource {
        type Item = Cliente;
        type Form = ClienteForm;

        fn kind(&self) -> EntityKind {
            self.kind
        }

        fn id_of(item: &Cliente) -> i64 {
            item.id
        }

        async fn list(
            &self,
            page: Option<u32>,
            _cancel: &CancellationToken,
        ) -> Result<Page<Cliente>, ApiError> {
            let call = self.list_calls.fetch_add(1, Ordering::SeqCst);
            if let (0, Some((started, release))) = (call, &self.gate) {
                started.notify_one();
                release.notified().await;
                return Ok(Page::whole(vec![cliente(99, "Obsoleto")]));
            }
            let items = self.items.lock().unwrap().clone();
            if self.kind.is_server_paged() {
                return Ok(Page {
                    data: items,
                    current_page: page.unwrap_or(1),
                    last_page: 3,
                    per_page: 2,
                    total: 6,
                });
            }
            Ok(Page::whole(items))
        }

        async fn get(&self, id: i64, _cancel: &CancellationToken) -> Result<Cliente, ApiError> {
            if let Some((started, release)) = &self.get_gate {
                started.notify_one();
                release.notified().await;
            }
            self.items
                .lock()
                .unwrap()
                .iter()
                .find(|c| c.id == id)
                .cloned()
                .ok_or(ApiError::Http {
                    status: 404,
                    message: "Cliente no encontrado".to_string(),
                })
        }

        async fn create(&self, form: &ClienteForm) -> Result<Cliente, ApiError> {
            form.validate(FormMode::Create)?;
            if self.fail_mutations.load(Ordering::SeqCst) {
                return Err(ApiError::Backend("Error al crear cliente".to_string()));
            }
            let created = cliente(100, &form.name);
            self.items.lock().unwrap().push(created.clone());
            Ok(created)
        }

        async fn update(&self, id: i64, form: &ClienteForm) -> Result<Cliente, ApiError> {
            form.validate(FormMode::Edit)?;
            Ok(cliente(id, &form.name))
        }

        async fn delete(&self, id: i64) -> Result<(), ApiError> {
            if self.fail_mutations.load(Ordering::SeqCst) {
                return Err(ApiError::Unauthorized("Unauthenticated.".to_string()));
            }
            self.items.lock().unwrap().retain(|c| c.id != id);
            Ok(())
        }
    }

    fn clientes_store() -> EntityStore<FakeResource> {
        let items = vec![cliente(1, "Ana"), cliente(2, "Bruno")];
        EntityStore::new(FakeResource::new(EntityKind::Clientes, items), 5)
    }

    #[tokio::test]
    async fn test_failed_create_keeps_data_and_refetch_clears_error() {
        let store = clientes_store();
        assert!(store.refetch().await);
        let before = store.snapshot();
        assert_eq!(before.data.len(), 2);

        store.resource().fail_mutations.store(true, Ordering::SeqCst);
        assert!(store.create(&form("Carla")).await.is_none());
        let after = store.snapshot();
        assert_eq!(after.data, before.data);
        assert!(!after.loading);
        assert_eq!(after.error.as_deref(), Some("Error al crear cliente"));

        assert!(store.refetch().await);
        assert!(store.snapshot().error.is_none());
    }

    #[tokio::test]
    async fn test_invalid_form_never_reaches_the_list() {
        let store = clientes_store();
        store.refetch().await;
        let mut bad = form("Carla");
        bad.email = "sin-arroba".to_string();

        assert!(store.create(&bad).await.is_none());
        assert_eq!(store.all().len(), 2);
        assert!(store.snapshot().error.unwrap().contains("email"));
    }

    #[tokio::test]
    async fn test_mutations_update_cache_and_revision() {
        let store = clientes_store();
        let mut revisions = store.subscribe();
        store.refetch().await;
        let start = store.revision();

        let created = store.create(&form("Carla")).await.unwrap();
        assert_eq!(store.all()[0].id, created.id);

        let renamed = store.update(1, &form("Ana María")).await.unwrap();
        assert_eq!(renamed.name, "Ana María");
        assert!(store.all().iter().any(|c| c.name == "Ana María"));

        assert!(store.delete(2).await);
        assert_eq!(store.all().len(), 2);
        assert_eq!(store.revision(), start + 3);
        assert!(revisions.has_changed().unwrap());
    }

    #[tokio::test]
    async fn test_failed_delete_keeps_row() {
        let store = clientes_store();
        store.refetch().await;
        store.resource().fail_mutations.store(true, Ordering::SeqCst);

        assert!(!store.delete(1).await);
        assert_eq!(store.all().len(), 2);
        assert!(store.snapshot().error.unwrap().starts_with("unauthorized"));
    }

    #[tokio::test]
    async fn test_client_paging_slices_locally() {
        let items = (1..=13).map(|i| cliente(i, &format!("Cliente {i}"))).collect();
        let store = EntityStore::new(FakeResource::new(EntityKind::Clientes, items), 5);
        store.refetch().await;
        assert_eq!(store.snapshot().total_pages, 3);

        assert!(store.set_page(3).await);
        assert_eq!(store.page_rows().len(), 3);
        assert!(!store.set_page(4).await);
        assert!(!store.set_page(0).await);
        assert_eq!(store.snapshot().page, 3);
        assert_eq!(store.resource().list_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_server_paging_fetches_each_page() {
        let items = vec![cliente(1, "Panel LED"), cliente(2, "Vinil")];
        let store = EntityStore::new(FakeResource::new(EntityKind::Blogs, items), 5);
        store.refetch().await;
        assert_eq!(store.snapshot().total_pages, 3);

        assert!(store.set_page(2).await);
        assert_eq!(store.snapshot().page, 2);
        assert!(!store.set_page(4).await);
        assert_eq!(store.resource().list_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_superseded_fetch_does_not_overwrite_state() {
        let started = Arc::new(Notify::new());
        let release = Arc::new(Notify::new());
        let mut fake = FakeResource::new(EntityKind::Clientes, vec![cliente(1, "Ana")]);
        fake.gate = Some((started.clone(), release.clone()));
        let store = Arc::new(EntityStore::new(fake, 5));

        let slow = tokio::spawn({
            let store = store.clone();
            async move { store.refetch().await }
        });
        started.notified().await;

        assert!(store.refetch().await);
        release.notify_one();
        assert!(!slow.await.unwrap());

        let snapshot = store.snapshot();
        assert_eq!(snapshot.data.len(), 1);
        assert_eq!(snapshot.data[0].name, "Ana");
        assert!(!snapshot.loading);
    }

    #[tokio::test]
    async fn test_shutdown_discards_pending_fetch() {
        let started = Arc::new(Notify::new());
        let release = Arc::new(Notify::new());
        let mut fake = FakeResource::new(EntityKind::Clientes, vec![]);
        fake.gate = Some((started.clone(), release.clone()));
        let store = Arc::new(EntityStore::new(fake, 5));

        let pending = tokio::spawn({
            let store = store.clone();
            async move { store.refetch().await }
        });
        started.notified().await;
        store.shutdown();
        release.notify_one();

        assert!(!pending.await.unwrap());
        assert!(store.all().is_empty());
        assert!(!store.snapshot().loading);
    }

    #[tokio::test]
    async fn test_shutdown_during_fetch_one_clears_loading() {
        let started = Arc::new(Notify::new());
        let release = Arc::new(Notify::new());
        let mut fake = FakeResource::new(EntityKind::Clientes, vec![cliente(1, "Ana")]);
        fake.get_gate = Some((started.clone(), release.clone()));
        let store = Arc::new(EntityStore::new(fake, 5));

        let pending = tokio::spawn({
            let store = store.clone();
            async move { store.fetch_one(1).await }
        });
        started.notified().await;
        assert!(store.snapshot().loading);
        store.shutdown();
        release.notify_one();

        assert!(pending.await.unwrap().is_none());
        let snapshot = store.snapshot();
        assert!(!snapshot.loading);
        assert!(snapshot.error.is_none());
    }
}
