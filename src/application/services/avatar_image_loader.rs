//! Authenticated avatar image loader.
//!
//! Callers set the reference they want shown and observe a watch channel
//! carrying the URL to display. Each change of reference starts a new load
//! cycle: the previous fetch task is aborted and the previously owned local
//! URL is revoked before the new cycle begins. A generation counter guards
//! completions so a late answer for an old reference is dropped without
//! ever binding a URL.

use std::sync::Arc;

use bytes::Bytes;
use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::domain::entities::{AvatarImageState, ImageReference, LoadOutcome, LocalImageUrl};
use crate::domain::errors::LoadError;
use crate::domain::ports::{
    CredentialStoragePort, ImageTransport, ObjectUrlRegistry, OwnedObjectUrl, PathResolver,
};

const FALLBACK_MEDIA_TYPE: &str = "application/octet-stream";

/// Turns image references into displayable local URLs under bearer auth.
///
/// Must be used from within a Tokio runtime.
pub struct AvatarImageLoader {
    shared: Arc<Shared>,
}

struct Shared {
    resolver: Arc<dyn PathResolver>,
    credentials: Arc<dyn CredentialStoragePort>,
    transport: Arc<dyn ImageTransport>,
    registry: Arc<dyn ObjectUrlRegistry>,
    cycle: Mutex<Cycle>,
    state_tx: watch::Sender<AvatarImageState>,
}

#[derive(Default)]
struct Cycle {
    generation: u64,
    task: Option<JoinHandle<()>>,
    owned: Option<OwnedObjectUrl>,
}

impl Cycle {
    /// Starts a new generation, aborting the in-flight fetch and releasing
    /// the owned URL.
    fn advance(&mut self) -> u64 {
        self.generation += 1;
        if let Some(task) = self.task.take() {
            task.abort();
        }
        self.owned = None;
        self.generation
    }
}

impl std::fmt::Debug for AvatarImageLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AvatarImageLoader")
            .field("state", &*self.shared.state_tx.borrow())
            .finish_non_exhaustive()
    }
}

impl AvatarImageLoader {
    /// Creates a loader with no reference set.
    #[must_use]
    pub fn new(
        resolver: Arc<dyn PathResolver>,
        credentials: Arc<dyn CredentialStoragePort>,
        transport: Arc<dyn ImageTransport>,
        registry: Arc<dyn ObjectUrlRegistry>,
    ) -> Self {
        let (state_tx, _) = watch::channel(AvatarImageState::default());
        Self {
            shared: Arc::new(Shared {
                resolver,
                credentials,
                transport,
                registry,
                cycle: Mutex::new(Cycle::default()),
                state_tx,
            }),
        }
    }

    /// Subscribes to state changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<AvatarImageState> {
        self.shared.state_tx.subscribe()
    }

    /// Current state snapshot.
    #[must_use]
    pub fn state(&self) -> AvatarImageState {
        self.shared.state_tx.borrow().clone()
    }

    /// URL to display right now, if any.
    #[must_use]
    pub fn display_url(&self) -> Option<LocalImageUrl> {
        self.shared.state_tx.borrow().display.clone()
    }

    /// Requests `path`. Setting the reference already requested is a no-op.
    pub fn set_path(&self, path: Option<ImageReference>) {
        let mut cycle = self.shared.cycle.lock();
        if self.shared.state_tx.borrow().reference == path {
            return;
        }

        let generation = cycle.advance();

        match path {
            None => {
                self.shared.publish(None, None, LoadOutcome::NoReference);
            }
            Some(reference) if reference.is_local_object_url() => {
                debug!(reference = %reference.digest(), "Passing local avatar URL through");
                let url = LocalImageUrl::from(&reference);
                self.shared
                    .publish(Some(reference), Some(url), LoadOutcome::PassThrough);
            }
            Some(reference) => {
                self.shared
                    .publish(Some(reference.clone()), None, LoadOutcome::Pending);
                let shared = self.shared.clone();
                cycle.task = Some(tokio::spawn(Shared::run_cycle(
                    shared, generation, reference,
                )));
            }
        }
    }

    /// Clears the reference, releasing any owned URL.
    pub fn clear(&self) {
        self.set_path(None);
    }

    /// Waits until the current cycle has finished and returns its state.
    pub async fn settled(&self) -> AvatarImageState {
        let mut rx = self.subscribe();
        match rx.wait_for(AvatarImageState::is_settled).await {
            Ok(state) => state.clone(),
            Err(_) => self.state(),
        }
    }
}

impl Drop for AvatarImageLoader {
    fn drop(&mut self) {
        let released = {
            let mut cycle = self.shared.cycle.lock();
            cycle.generation += 1;
            if let Some(task) = cycle.task.take() {
                task.abort();
            }
            let owned = cycle.owned.take();
            self.shared.publish(None, None, LoadOutcome::NoReference);
            owned
        };
        if released.is_some() {
            debug!("Released avatar URL on teardown");
        }
    }
}

impl Shared {
    fn publish(
        &self,
        reference: Option<ImageReference>,
        display: Option<LocalImageUrl>,
        outcome: LoadOutcome,
    ) {
        self.state_tx.send_replace(AvatarImageState {
            reference,
            display,
            outcome,
        });
    }

    async fn run_cycle(shared: Arc<Self>, generation: u64, reference: ImageReference) {
        let result = shared.fetch(&reference).await;

        let mut cycle = shared.cycle.lock();
        if cycle.generation != generation {
            debug!(reference = %reference.digest(), "Discarding superseded avatar load");
            return;
        }

        match result {
            Ok((body, media_type)) => {
                let owned = OwnedObjectUrl::create(shared.registry.clone(), body, &media_type);
                let url = owned.url().clone();
                cycle.owned = Some(owned);
                debug!(reference = %reference.digest(), url = %url, "Avatar loaded");
                shared.publish(Some(reference), Some(url), LoadOutcome::Loaded);
            }
            Err(error) => {
                if error.is_not_found() {
                    debug!(reference = %reference.digest(), "Avatar not found");
                } else {
                    warn!(
                        reference = %reference.digest(),
                        error = %error,
                        transient = error.is_transient(),
                        "Avatar load failed, falling back to placeholder"
                    );
                }
                shared.publish(Some(reference), None, LoadOutcome::Failed(error));
            }
        }
    }

    async fn fetch(&self, reference: &ImageReference) -> Result<(Bytes, String), LoadError> {
        let url = self
            .resolver
            .resolve(reference)
            .ok_or(LoadError::Unresolvable)?;

        let token = match self.credentials.get_token().await {
            Ok(Some(token)) => token,
            Ok(None) => return Err(LoadError::Unauthenticated),
            Err(e) => {
                warn!(error = %e, "Credential cache unavailable");
                return Err(LoadError::Unauthenticated);
            }
        };

        debug!(
            reference = %reference.digest(),
            token = %token.fingerprint(),
            "Downloading avatar"
        );

        let response = self.transport.get(&url, &token).await?;

        match response.status {
            404 => Err(LoadError::NotFound),
            status if !response.is_success() => Err(LoadError::HttpStatus { status }),
            _ => Ok((
                response.body,
                response
                    .content_type
                    .unwrap_or_else(|| FALLBACK_MEDIA_TYPE.to_string()),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::BearerToken;
    use crate::domain::ports::mocks::{MockCredentialStorage, MockImageTransport, ScriptedReply};
    use crate::infrastructure::api::ApiPathResolver;
    use crate::infrastructure::image::InMemoryObjectUrlRegistry;

    const BASE: &str = "https://school.example/api/";
    const URL_A: &str = "https://school.example/uploads/a.png";
    const URL_B: &str = "https://school.example/uploads/b.png";

    fn token() -> BearerToken {
        BearerToken::new_unchecked("eyJhbGciOiJIUzI1NiJ9.payload.sig")
    }

    fn reference(path: &str) -> Option<ImageReference> {
        ImageReference::new(path)
    }

    struct Fixture {
        loader: AvatarImageLoader,
        transport: Arc<MockImageTransport>,
        registry: Arc<InMemoryObjectUrlRegistry>,
    }

    fn fixture(transport: MockImageTransport, credentials: MockCredentialStorage) -> Fixture {
        let transport = Arc::new(transport);
        let registry = Arc::new(InMemoryObjectUrlRegistry::new());
        let loader = AvatarImageLoader::new(
            Arc::new(ApiPathResolver::new(BASE)),
            Arc::new(credentials),
            transport.clone(),
            registry.clone(),
        );
        Fixture {
            loader,
            transport,
            registry,
        }
    }

    fn bytes_of(registry: &InMemoryObjectUrlRegistry, url: &LocalImageUrl) -> Vec<u8> {
        registry.lookup(url).unwrap().0.to_vec()
    }

    #[tokio::test]
    async fn test_absent_path_makes_no_request() {
        let f = fixture(
            MockImageTransport::new(),
            MockCredentialStorage::with_token(token()),
        );

        f.loader.set_path(None);
        let state = f.loader.settled().await;

        assert_eq!(state.outcome, LoadOutcome::NoReference);
        assert!(state.display.is_none());
        assert!(f.transport.requests().is_empty());
    }

    #[tokio::test]
    async fn test_successful_load_sends_bearer_token() {
        let f = fixture(
            MockImageTransport::new().ok(URL_A, b"A"),
            MockCredentialStorage::with_token(token()),
        );

        f.loader.set_path(reference("/uploads/a.png"));
        assert_eq!(f.loader.state().outcome, LoadOutcome::Pending);

        let state = f.loader.settled().await;
        assert_eq!(state.outcome, LoadOutcome::Loaded);

        let url = state.display.unwrap();
        assert_eq!(bytes_of(&f.registry, &url), b"A");
        assert_eq!(
            f.transport.requests(),
            vec![(URL_A.to_string(), token().as_str().to_string())]
        );
    }

    #[tokio::test]
    async fn test_local_url_passes_through_unowned() {
        let f = fixture(
            MockImageTransport::new(),
            MockCredentialStorage::with_token(token()),
        );
        let preview = f.registry.create(Bytes::from_static(b"p"), "image/png");

        f.loader.set_path(reference(preview.as_str()));
        let state = f.loader.settled().await;

        assert_eq!(state.outcome, LoadOutcome::PassThrough);
        assert_eq!(state.display.as_ref(), Some(&preview));
        assert!(f.transport.requests().is_empty());

        f.loader.clear();
        assert!(f.registry.lookup(&preview).is_some());
    }

    #[tokio::test]
    async fn test_not_found_and_missing_credential_are_both_absent() {
        let found_nothing = fixture(
            MockImageTransport::new().reply(
                URL_A,
                ScriptedReply::Respond {
                    status: 404,
                    body: Bytes::new(),
                },
            ),
            MockCredentialStorage::with_token(token()),
        );
        found_nothing.loader.set_path(reference("/uploads/a.png"));
        let state = found_nothing.loader.settled().await;
        assert!(state.display.is_none());
        assert_eq!(state.outcome, LoadOutcome::Failed(LoadError::NotFound));

        let signed_out = fixture(
            MockImageTransport::new().ok(URL_A, b"A"),
            MockCredentialStorage::new(),
        );
        signed_out.loader.set_path(reference("/uploads/a.png"));
        let state = signed_out.loader.settled().await;
        assert!(state.display.is_none());
        assert_eq!(state.outcome, LoadOutcome::Failed(LoadError::Unauthenticated));
        assert!(signed_out.transport.requests().is_empty());
    }

    #[tokio::test]
    async fn test_credential_failure_is_unauthenticated() {
        let f = fixture(
            MockImageTransport::new().ok(URL_A, b"A"),
            MockCredentialStorage::failing(),
        );
        f.loader.set_path(reference("/uploads/a.png"));
        let state = f.loader.settled().await;
        assert_eq!(state.outcome, LoadOutcome::Failed(LoadError::Unauthenticated));
    }

    #[tokio::test]
    async fn test_server_and_transport_failures_are_absent() {
        let f = fixture(
            MockImageTransport::new()
                .reply(
                    URL_A,
                    ScriptedReply::Respond {
                        status: 500,
                        body: Bytes::from_static(b"oops"),
                    },
                )
                .reply(URL_B, ScriptedReply::Fail("connection reset".to_string())),
            MockCredentialStorage::with_token(token()),
        );

        f.loader.set_path(reference("/uploads/a.png"));
        let state = f.loader.settled().await;
        assert_eq!(
            state.outcome,
            LoadOutcome::Failed(LoadError::HttpStatus { status: 500 })
        );

        f.loader.set_path(reference("/uploads/b.png"));
        let state = f.loader.settled().await;
        assert_eq!(
            state.outcome,
            LoadOutcome::Failed(LoadError::transport("connection reset"))
        );
        assert!(state.display.is_none());
        assert_eq!(f.registry.live_count(), 0);
    }

    #[tokio::test]
    async fn test_unresolvable_reference_is_absent() {
        let f = fixture(
            MockImageTransport::new(),
            MockCredentialStorage::with_token(token()),
        );
        f.loader.set_path(reference("ftp://files.example/a.png"));
        let state = f.loader.settled().await;
        assert_eq!(state.outcome, LoadOutcome::Failed(LoadError::Unresolvable));
        assert!(f.transport.requests().is_empty());
    }

    #[tokio::test]
    async fn test_supersession_a_b_a_leaks_nothing() {
        let f = fixture(
            MockImageTransport::new()
                .ok(URL_A, b"A")
                .reply(URL_B, ScriptedReply::Hang),
            MockCredentialStorage::with_token(token()),
        );

        f.loader.set_path(reference("/uploads/a.png"));
        let first = f.loader.settled().await.display.unwrap();
        assert_eq!(f.registry.live_count(), 1);

        f.loader.set_path(reference("/uploads/b.png"));
        assert!(f.registry.lookup(&first).is_none());
        assert!(f.loader.display_url().is_none());
        tokio::task::yield_now().await;

        f.loader.set_path(reference("/uploads/a.png"));
        let state = f.loader.settled().await;

        assert_eq!(state.outcome, LoadOutcome::Loaded);
        assert_eq!(state.reference, reference("/uploads/a.png"));
        let shown = state.display.unwrap();
        assert_eq!(bytes_of(&f.registry, &shown), b"A");
        assert_eq!(f.registry.live_count(), 1);
    }

    #[tokio::test]
    async fn test_same_path_does_not_refetch() {
        let f = fixture(
            MockImageTransport::new().ok(URL_A, b"A"),
            MockCredentialStorage::with_token(token()),
        );

        f.loader.set_path(reference("/uploads/a.png"));
        f.loader.settled().await;
        f.loader.set_path(reference("/uploads/a.png"));
        f.loader.settled().await;

        assert_eq!(f.transport.requests().len(), 1);
        assert_eq!(f.registry.live_count(), 1);
    }

    #[tokio::test]
    async fn test_teardown_revokes_and_cancels() {
        let f = fixture(
            MockImageTransport::new()
                .ok(URL_A, b"A")
                .reply(URL_B, ScriptedReply::Hang),
            MockCredentialStorage::with_token(token()),
        );

        f.loader.set_path(reference("/uploads/a.png"));
        f.loader.settled().await;
        let mut shown = f.loader.subscribe();
        assert!(shown.borrow_and_update().display.is_some());
        assert_eq!(f.registry.live_count(), 1);
        drop(f.loader);
        assert_eq!(f.registry.live_count(), 0);
        assert_eq!(*shown.borrow_and_update(), AvatarImageState::default());

        let g = fixture(
            MockImageTransport::new().reply(URL_B, ScriptedReply::Hang),
            MockCredentialStorage::with_token(token()),
        );
        let mut rx = g.loader.subscribe();
        g.loader.set_path(reference("/uploads/b.png"));
        tokio::task::yield_now().await;
        drop(g.loader);

        assert_eq!(g.registry.live_count(), 0);
        let last = rx.borrow_and_update().clone();
        assert_eq!(last.outcome, LoadOutcome::NoReference);
        assert!(last.display.is_none());
    }

    #[tokio::test]
    async fn test_settled_waits_for_in_flight_fetch() {
        let f = fixture(
            MockImageTransport::new().reply(URL_B, ScriptedReply::Hang),
            MockCredentialStorage::with_token(token()),
        );
        f.loader.set_path(reference("/uploads/b.png"));

        let mut waiting = tokio_test::task::spawn(f.loader.settled());
        tokio_test::assert_pending!(waiting.poll());

        f.loader.clear();
        assert!(waiting.is_woken());
        let state = tokio_test::assert_ready!(waiting.poll());
        assert_eq!(state.outcome, LoadOutcome::NoReference);
    }

    #[tokio::test]
    async fn test_clear_releases_owned_url() {
        let f = fixture(
            MockImageTransport::new().ok(URL_A, b"A"),
            MockCredentialStorage::with_token(token()),
        );

        f.loader.set_path(reference("/uploads/a.png"));
        f.loader.settled().await;
        f.loader.clear();

        assert_eq!(f.registry.live_count(), 0);
        assert_eq!(f.loader.state(), AvatarImageState::default());
    }
}
