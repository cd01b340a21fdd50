//! Gallery controller: the four request handlers over one state container.
//!
//! DESIGN
//! ======
//! Every mutation is a single request followed by an unconditional refetch
//! of the whole collection (`idle -> requesting -> resyncing -> idle`).
//! Nothing is patched locally; the refetch is the only way a mutation's
//! effect reaches `items`. A failed request still resyncs.
//!
//! CONCURRENCY
//! ===========
//! State lives behind an `RwLock` that is never held across a network
//! await. Create is gated by `is_submitting`; update and delete are not
//! serialized, so overlapping calls each refetch and the last response to
//! land wins.

#[cfg(test)]
#[path = "client_test.rs"]
mod client_test;

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::net::api::{ApiError, ItemApi};
use crate::net::types::{Item, ItemId};
use crate::net::upload::ImageUpload;
use crate::prompt::{DescriptionPrompt, PromptOutcome};
use crate::state::gallery::{GalleryState, Operation};
use crate::view::{self, GalleryView};

/// Lifecycle of one mutation, as traced.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MutationPhase {
    Idle,
    Requesting,
    Resyncing,
}

/// Why a mutation sent no request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SkipReason {
    /// A create is already in flight.
    Busy,
    MissingImage,
    EmptyDescription,
    Cancelled,
}

/// Result of one mutation.
#[derive(Debug)]
pub enum MutationOutcome {
    /// Nothing was sent.
    Skipped(SkipReason),
    /// The request was sent and the collection refetched. `refetch` carries
    /// the number of items loaded.
    Resynced { request: Result<(), ApiError>, refetch: Result<usize, ApiError> },
}

impl MutationOutcome {
    #[must_use]
    pub fn was_sent(&self) -> bool {
        matches!(self, Self::Resynced { .. })
    }

    #[must_use]
    pub fn request_succeeded(&self) -> bool {
        matches!(self, Self::Resynced { request: Ok(()), .. })
    }
}

/// A create that passed the submit gate. `is_submitting` stays set until it
/// is handed to [`GalleryClient::send_create`].
#[derive(Debug)]
#[must_use = "is_submitting stays set until the create is sent"]
pub struct PendingCreate {
    image: ImageUpload,
    description: String,
}

/// Owns the gallery state and talks to the item server through `A`.
pub struct GalleryClient<A> {
    api: Arc<A>,
    state: Arc<RwLock<GalleryState>>,
}

impl<A> Clone for GalleryClient<A> {
    fn clone(&self) -> Self {
        Self { api: Arc::clone(&self.api), state: Arc::clone(&self.state) }
    }
}

impl<A: ItemApi> GalleryClient<A> {
    pub fn new(api: A) -> Self {
        Self::from_shared(Arc::new(api))
    }

    /// Build around an API handle the caller keeps a reference to.
    pub fn from_shared(api: Arc<A>) -> Self {
        Self { api, state: Arc::new(RwLock::new(GalleryState::default())) }
    }

    #[must_use]
    pub fn api(&self) -> &A {
        &self.api
    }

    // =========================================================================
    // REQUEST HANDLERS
    // =========================================================================

    /// Fetch the full collection and replace `items` with it verbatim.
    ///
    /// # Errors
    ///
    /// Returns the API error; `items` keeps its previous value and a notice
    /// is recorded.
    pub async fn load_items(&self) -> Result<usize, ApiError> {
        match self.api.list_items().await {
            Ok(items) => {
                let count = items.len();
                let mut state = self.state.write().await;
                state.replace_items(items);
                if state.notice().is_some_and(|n| n.operation == Operation::Load) {
                    state.dismiss_notice();
                }
                tracing::debug!(count, "items loaded");
                Ok(count)
            }
            Err(e) => {
                tracing::warn!(error = %e, "item load failed");
                self.state.write().await.set_notice(Operation::Load, e.to_string());
                Err(e)
            }
        }
    }

    /// Stage `image` and `description` in the draft and submit it.
    ///
    /// Skipped without touching the draft while another create is in flight.
    pub async fn create_item(&self, image: ImageUpload, description: &str) -> MutationOutcome {
        let staged = {
            let mut state = self.state.write().await;
            if state.is_submitting() {
                tracing::debug!("create skipped: submission in flight");
                return MutationOutcome::Skipped(SkipReason::Busy);
            }
            state.select_image(image);
            state.set_description(description);
            begin_submit(&mut state)
        };
        self.finish_submit(staged).await
    }

    /// Submit the current draft (the form-submit path).
    pub async fn submit_draft(&self) -> MutationOutcome {
        match self.stage_draft().await {
            Ok(pending) => self.send_create(pending).await,
            Err(reason) => MutationOutcome::Skipped(reason),
        }
    }

    /// First half of [`Self::submit_draft`]: validate the draft and set
    /// `is_submitting`, so the caller can render the in-flight form before
    /// the request goes out.
    ///
    /// # Errors
    ///
    /// Returns the reason nothing will be sent; state is left untouched.
    pub async fn stage_draft(&self) -> Result<PendingCreate, SkipReason> {
        let staged = begin_submit(&mut *self.state.write().await);
        if let Err(reason) = &staged {
            tracing::debug!(?reason, "create skipped");
        }
        staged
    }

    /// Second half of [`Self::submit_draft`]: POST the staged create, then
    /// resync and clear `is_submitting`.
    pub async fn send_create(&self, pending: PendingCreate) -> MutationOutcome {
        self.finish_submit(Ok(pending)).await
    }

    /// Send a new description for `id`. Cancelled or empty input sends
    /// nothing.
    pub async fn update_item(&self, id: &ItemId, outcome: PromptOutcome) -> MutationOutcome {
        let Some(description) = outcome.description() else {
            let reason = match &outcome {
                PromptOutcome::Cancelled => SkipReason::Cancelled,
                PromptOutcome::Entered(_) => SkipReason::EmptyDescription,
            };
            tracing::debug!(%id, ?reason, "update abandoned");
            return MutationOutcome::Skipped(reason);
        };
        transition(Operation::Update, MutationPhase::Requesting);
        let request = self.api.update_item(id, description).await;
        self.resync(Operation::Update, request).await
    }

    /// Ask `prompt` for a new description, then run [`Self::update_item`].
    pub async fn update_with_prompt(
        &self,
        id: &ItemId,
        prompt: &mut dyn DescriptionPrompt,
    ) -> MutationOutcome {
        let outcome = prompt.ask(id).await;
        self.update_item(id, outcome).await
    }

    /// Delete `id`. No confirmation step.
    pub async fn delete_item(&self, id: &ItemId) -> MutationOutcome {
        transition(Operation::Delete, MutationPhase::Requesting);
        let request = self.api.delete_item(id).await;
        self.resync(Operation::Delete, request).await
    }

    async fn finish_submit(
        &self,
        staged: Result<PendingCreate, SkipReason>,
    ) -> MutationOutcome {
        let PendingCreate { image, description } = match staged {
            Ok(staged) => staged,
            Err(reason) => {
                tracing::debug!(?reason, "create skipped");
                return MutationOutcome::Skipped(reason);
            }
        };

        transition(Operation::Create, MutationPhase::Requesting);
        let request = self.api.create_item(&image, &description).await;
        if request.is_ok() {
            self.state.write().await.clear_draft();
        }
        let outcome = self.resync(Operation::Create, request).await;
        self.state.write().await.set_submitting(false);
        outcome
    }

    async fn resync(&self, operation: Operation, request: Result<(), ApiError>) -> MutationOutcome {
        if let Err(e) = &request {
            tracing::warn!(%operation, error = %e, "request failed");
            self.state.write().await.set_notice(operation, e.to_string());
        }
        transition(operation, MutationPhase::Resyncing);
        let refetch = self.load_items().await;
        transition(operation, MutationPhase::Idle);
        MutationOutcome::Resynced { request, refetch }
    }

    // =========================================================================
    // DRAFT + VIEW
    // =========================================================================

    pub async fn select_image(&self, upload: ImageUpload) {
        self.state.write().await.select_image(upload);
    }

    pub async fn clear_image(&self) {
        self.state.write().await.clear_image();
    }

    pub async fn set_description(&self, text: impl Into<String>) {
        self.state.write().await.set_description(text);
    }

    pub async fn dismiss_notice(&self) {
        self.state.write().await.dismiss_notice();
    }

    /// Clone of the current state.
    pub async fn snapshot(&self) -> GalleryState {
        self.state.read().await.clone()
    }

    pub async fn items(&self) -> Vec<Item> {
        self.state.read().await.items().to_vec()
    }

    /// View model in the local time zone.
    pub async fn view(&self) -> GalleryView {
        view::build(&*self.state.read().await)
    }
}

/// Validate the draft and flip `is_submitting`. Runs under the write lock so
/// two submits cannot both pass the gate.
fn begin_submit(state: &mut GalleryState) -> Result<PendingCreate, SkipReason> {
    if state.is_submitting() {
        return Err(SkipReason::Busy);
    }
    let Some(image) = state.pending_image().filter(|i| !i.is_empty()).cloned() else {
        return Err(SkipReason::MissingImage);
    };
    if state.description_draft().is_empty() {
        return Err(SkipReason::EmptyDescription);
    }
    state.set_submitting(true);
    Ok(PendingCreate { image, description: state.description_draft().to_owned() })
}

fn transition(operation: Operation, phase: MutationPhase) {
    tracing::debug!(%operation, ?phase, "mutation phase");
}

// =============================================================================
// TEST HELPERS
// =============================================================================

#[cfg(test)]
pub mod test_helpers {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use tokio::sync::{Notify, oneshot};

    use super::*;

    /// One request observed by [`MockApi`].
    #[derive(Clone, Debug, PartialEq, Eq)]
    pub enum Call {
        List,
        Create { file_name: String, description: String },
        Update { id: ItemId, description: String },
        Delete { id: ItemId },
    }

    /// Recording [`ItemApi`] with scripted list responses.
    #[derive(Default)]
    pub struct MockApi {
        calls: Mutex<Vec<Call>>,
        lists: Mutex<VecDeque<Result<Vec<Item>, ApiError>>>,
        mutation_error: Mutex<Option<ApiError>>,
        create_gate: Mutex<Option<oneshot::Receiver<()>>>,
        pub create_entered: Notify,
    }

    impl MockApi {
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        /// Queue responses for successive `GET /items`. Once drained, lists
        /// return an empty collection.
        #[must_use]
        pub fn with_lists(self, lists: Vec<Result<Vec<Item>, ApiError>>) -> Self {
            *self.lists.lock().unwrap() = lists.into();
            self
        }

        /// Make every POST/PUT/DELETE fail with `error`.
        #[must_use]
        pub fn failing_mutations(self, error: ApiError) -> Self {
            *self.mutation_error.lock().unwrap() = Some(error);
            self
        }

        /// Hold the next create until the returned sender fires.
        pub fn gate_create(&self) -> oneshot::Sender<()> {
            let (tx, rx) = oneshot::channel();
            *self.create_gate.lock().unwrap() = Some(rx);
            tx
        }

        pub fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }

        fn record(&self, call: Call) {
            self.calls.lock().unwrap().push(call);
        }

        fn mutation_result(&self) -> Result<(), ApiError> {
            match self.mutation_error.lock().unwrap().clone() {
                Some(e) => Err(e),
                None => Ok(()),
            }
        }
    }

    #[async_trait]
    impl ItemApi for MockApi {
        async fn list_items(&self) -> Result<Vec<Item>, ApiError> {
            self.record(Call::List);
            self.lists.lock().unwrap().pop_front().unwrap_or(Ok(Vec::new()))
        }

        async fn create_item(&self, image: &ImageUpload, description: &str) -> Result<(), ApiError> {
            self.record(Call::Create {
                file_name: image.file_name.clone(),
                description: description.to_owned(),
            });
            self.create_entered.notify_one();
            let gate = self.create_gate.lock().unwrap().take();
            if let Some(gate) = gate {
                let _ = gate.await;
            }
            self.mutation_result()
        }

        async fn update_item(&self, id: &ItemId, description: &str) -> Result<(), ApiError> {
            self.record(Call::Update { id: id.clone(), description: description.to_owned() });
            self.mutation_result()
        }

        async fn delete_item(&self, id: &ItemId) -> Result<(), ApiError> {
            self.record(Call::Delete { id: id.clone() });
            self.mutation_result()
        }
    }

    #[must_use]
    pub fn item(id: i64, description: &str) -> Item {
        Item {
            id: ItemId::Number(id),
            image_url: "u".to_owned(),
            description: description.to_owned(),
            created_at: "2024-01-01T00:00:00Z".to_owned(),
        }
    }

    #[must_use]
    pub fn upload(name: &str) -> ImageUpload {
        ImageUpload::new(name, vec![0x89, b'P', b'N', b'G']).unwrap()
    }
}
