//! Per-demo state machine and request orchestration.
//!
//! `Idle -> Collecting -> Submitting -> ShowingResult`, falling back to
//! `Collecting` on any error. A demo owns exactly one controller and at
//! most one request is in flight per controller.

use crate::config::VisionConfig;
use crate::error::{DemoError, TransportError};
use crate::modality::Modality;
use crate::request::{DemoInput, LabelSet, MAX_WEIGHTING, Payload};
use crate::result::{DemoResult, interpret};
use crate::session::{CreditsRefresher, TokenSource};
use std::future::Future;
use url::Url;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DemoPhase {
    Idle,
    Collecting,
    Submitting,
    ShowingResult,
}

/// Raw HTTP reply handed back by a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpReply {
    pub status: u16,
    pub body: String,
}

/// Everything a transport needs to issue one call.
#[derive(Debug, Clone)]
pub struct Submission<I> {
    pub request_id: Uuid,
    pub url: Url,
    pub bearer_token: Option<String>,
    pub payload: Payload<I>,
}

/// Issues the multipart POST. Network failures map to
/// `TransportError::Network`; any HTTP status is a successful reply.
pub trait Transport<I> {
    fn post(&self, submission: &Submission<I>)
    -> impl Future<Output = Result<HttpReply, TransportError>>;
}

#[derive(Debug, Clone)]
pub struct DemoController<I> {
    modality: Modality,
    input: DemoInput<I>,
    phase: DemoPhase,
    result: Option<DemoResult>,
    in_flight: Option<Uuid>,
    // In-flight call whose image was replaced before it answered.
    superseded: Option<Uuid>,
}

impl<I: Clone> DemoController<I> {
    pub fn new(modality: Modality) -> Self {
        Self {
            modality,
            input: DemoInput::default(),
            phase: DemoPhase::Idle,
            result: None,
            in_flight: None,
            superseded: None,
        }
    }

    pub fn modality(&self) -> Modality {
        self.modality
    }

    pub fn input(&self) -> &DemoInput<I> {
        &self.input
    }

    pub fn phase(&self) -> DemoPhase {
        self.phase
    }

    pub fn result(&self) -> Option<&DemoResult> {
        self.result.as_ref()
    }

    /// Gates the action button.
    pub fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }

    /// A new image invalidates whatever result is on screen, including the
    /// one still on its way.
    pub fn select_image(&mut self, image: I) {
        self.input.image = Some(image);
        self.invalidate_result();
    }

    pub fn clear_image(&mut self) {
        self.input.image = None;
        self.invalidate_result();
    }

    fn invalidate_result(&mut self) {
        self.result = None;
        if let Some(request_id) = self.in_flight {
            log::debug!("{} request {} superseded by a new image", self.modality, request_id);
            self.superseded = Some(request_id);
        }
        self.touch();
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.input.text = text.into();
        self.touch();
    }

    pub fn set_weighting(&mut self, weighting: u8) {
        self.input.weighting = weighting.min(MAX_WEIGHTING);
        self.touch();
    }

    pub fn add_label(&mut self, label: &str) -> bool {
        let added = self.input.labels.add(label);
        if added {
            self.touch();
        }
        added
    }

    pub fn remove_label(&mut self, label: &str) -> bool {
        let removed = self.input.labels.remove(label);
        if removed {
            self.touch();
        }
        removed
    }

    pub fn replace_labels(&mut self, labels: LabelSet) {
        self.input.labels = labels;
        self.touch();
    }

    fn touch(&mut self) {
        if self.phase != DemoPhase::Submitting {
            self.phase = DemoPhase::Collecting;
        }
    }

    /// Validates the input, fetches the token and marks the controller
    /// busy. Nothing is sent on error.
    pub fn begin<S: TokenSource>(
        &mut self,
        config: &VisionConfig,
        tokens: &S,
    ) -> Result<Submission<I>, DemoError> {
        if self.is_busy() {
            return Err(DemoError::Busy);
        }
        let prepared = self.prepare(config, tokens);
        match &prepared {
            Ok(submission) => {
                self.in_flight = Some(submission.request_id);
                self.phase = DemoPhase::Submitting;
                log::info!(
                    "submitting {} request {}",
                    self.modality,
                    submission.request_id
                );
            }
            Err(e) => {
                self.phase = DemoPhase::Collecting;
                log::warn!("{} request not sent: {}", self.modality, e);
            }
        }
        prepared
    }

    fn prepare<S: TokenSource>(
        &self,
        config: &VisionConfig,
        tokens: &S,
    ) -> Result<Submission<I>, DemoError> {
        let request = self.input.to_request(self.modality)?;
        let bearer_token = tokens.access_token();
        if bearer_token.is_none() && !config.allows_anonymous(self.modality) {
            return Err(DemoError::Unauthenticated);
        }
        let url = config
            .endpoint(self.modality)
            .map_err(|e| TransportError::Network(format!("invalid endpoint: {}", e)))?;
        Ok(Submission {
            request_id: Uuid::new_v4(),
            url,
            bearer_token,
            payload: request.into_payload(config.search_top_k),
        })
    }

    /// Applies the outcome of the call `request_id` started by `begin`. On
    /// success the result replaces the previous one and, when a user id is
    /// known, the credits refresh is triggered once. On error nothing
    /// displayed changes. A reply to a call whose image has since been
    /// replaced only releases the busy flag.
    pub fn complete<C: CreditsRefresher>(
        &mut self,
        request_id: Uuid,
        outcome: Result<HttpReply, TransportError>,
        user_id: Option<&str>,
        credits: &C,
    ) -> Result<&DemoResult, DemoError> {
        if self.in_flight != Some(request_id) {
            log::warn!("{} reply to unknown request {} ignored", self.modality, request_id);
            return Err(DemoError::Superseded);
        }
        self.in_flight = None;
        if self.superseded.take() == Some(request_id) {
            log::info!("{} request {} answered after its image changed", self.modality, request_id);
            self.phase = DemoPhase::Collecting;
            return Err(DemoError::Superseded);
        }

        let interpreted = outcome
            .map_err(DemoError::from)
            .and_then(|reply| interpret(self.modality, reply.status, &reply.body));

        match interpreted {
            Ok(result) => {
                log::info!("{} request {} completed", self.modality, request_id);
                self.phase = DemoPhase::ShowingResult;
                if let Some(user_id) = user_id {
                    credits.refresh(user_id);
                }
                Ok(self.result.insert(result))
            }
            Err(e) => {
                log::error!("{} request {} failed: {}", self.modality, request_id, e);
                self.phase = DemoPhase::Collecting;
                Err(e)
            }
        }
    }
}

/// One full round trip: validate, send, interpret, refresh credits.
pub async fn submit<I, T, S, C>(
    controller: &mut DemoController<I>,
    config: &VisionConfig,
    tokens: &S,
    transport: &T,
    user_id: Option<&str>,
    credits: &C,
) -> Result<DemoResult, DemoError>
where
    I: Clone,
    T: Transport<I>,
    S: TokenSource,
    C: CreditsRefresher,
{
    let submission = controller.begin(config, tokens)?;
    let outcome = transport.post(&submission).await;
    controller
        .complete(submission.request_id, outcome, user_id, credits)
        .cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[derive(Default)]
    struct Refreshes(RefCell<Vec<String>>);

    impl CreditsRefresher for Refreshes {
        fn refresh(&self, user_id: &str) {
            self.0.borrow_mut().push(user_id.to_string());
        }
    }

    fn token() -> Option<String> {
        Some("tok".to_string())
    }

    fn ok_detect() -> Result<HttpReply, TransportError> {
        Ok(HttpReply {
            status: 200,
            body: r#"{"detected_objects":[]}"#.to_string(),
        })
    }

    #[test]
    fn test_new_controller_is_idle() {
        let ctrl = DemoController::<&str>::new(Modality::Detect);
        assert_eq!(ctrl.phase(), DemoPhase::Idle);
        assert!(!ctrl.is_busy());
    }

    #[test]
    fn test_begin_marks_busy_and_blocks_duplicates() {
        let mut ctrl = DemoController::new(Modality::Detect);
        ctrl.select_image("a.jpg");
        let submission = ctrl.begin(&VisionConfig::default(), &token()).unwrap();
        assert_eq!(submission.bearer_token.as_deref(), Some("tok"));
        assert_eq!(submission.url.as_str(), "http://localhost:8000/api/v1/detect/");
        assert!(ctrl.is_busy());
        assert_eq!(ctrl.phase(), DemoPhase::Submitting);
        assert_eq!(
            ctrl.begin(&VisionConfig::default(), &token()).unwrap_err(),
            DemoError::Busy
        );
    }

    #[test]
    fn test_missing_token_aborts_before_sending() {
        let mut ctrl = DemoController::new(Modality::Classify);
        ctrl.select_image("a.jpg");
        let err = ctrl.begin(&VisionConfig::default(), &None::<String>).unwrap_err();
        assert_eq!(err, DemoError::Unauthenticated);
        assert!(!ctrl.is_busy());
        assert_eq!(ctrl.phase(), DemoPhase::Collecting);
    }

    #[test]
    fn test_anonymous_segment_when_allowed() {
        let config = VisionConfig {
            segment_requires_auth: false,
            ..VisionConfig::default()
        };
        let mut ctrl = DemoController::new(Modality::Segment);
        ctrl.select_image("a.jpg");
        let submission = ctrl.begin(&config, &None::<String>).unwrap();
        assert_eq!(submission.bearer_token, None);
    }

    #[test]
    fn test_success_refreshes_credits_once() {
        let refreshes = Refreshes::default();
        let mut ctrl = DemoController::new(Modality::Detect);
        ctrl.select_image("a.jpg");
        let call = ctrl.begin(&VisionConfig::default(), &token()).unwrap();
        ctrl.complete(call.request_id, ok_detect(), Some("user-1"), &refreshes)
            .unwrap();
        assert_eq!(*refreshes.0.borrow(), vec!["user-1".to_string()]);
        assert_eq!(ctrl.phase(), DemoPhase::ShowingResult);
        assert!(!ctrl.is_busy());
    }

    #[test]
    fn test_success_without_user_skips_refresh() {
        let refreshes = Refreshes::default();
        let mut ctrl = DemoController::new(Modality::Detect);
        ctrl.select_image("a.jpg");
        let call = ctrl.begin(&VisionConfig::default(), &token()).unwrap();
        ctrl.complete(call.request_id, ok_detect(), None, &refreshes)
            .unwrap();
        assert!(refreshes.0.borrow().is_empty());
    }

    #[test]
    fn test_quota_error_keeps_previous_result() {
        let refreshes = Refreshes::default();
        let mut ctrl = DemoController::new(Modality::Detect);
        ctrl.select_image("a.jpg");
        let call = ctrl.begin(&VisionConfig::default(), &token()).unwrap();
        ctrl.complete(call.request_id, ok_detect(), Some("u"), &refreshes)
            .unwrap();
        let before = ctrl.result().cloned();

        let call = ctrl.begin(&VisionConfig::default(), &token()).unwrap();
        let quota = Ok(HttpReply {
            status: 402,
            body: String::new(),
        });
        let err = ctrl
            .complete(call.request_id, quota, Some("u"), &refreshes)
            .unwrap_err();
        assert_eq!(err, DemoError::QuotaExceeded);
        assert_eq!(ctrl.result().cloned(), before);
        assert_eq!(refreshes.0.borrow().len(), 1);
        assert_eq!(ctrl.phase(), DemoPhase::Collecting);
        assert!(!ctrl.is_busy());
    }

    #[test]
    fn test_new_image_clears_result() {
        let mut ctrl = DemoController::new(Modality::Detect);
        ctrl.select_image("a.jpg");
        let call = ctrl.begin(&VisionConfig::default(), &token()).unwrap();
        ctrl.complete(call.request_id, ok_detect(), None, &Refreshes::default())
            .unwrap();
        assert!(ctrl.result().is_some());
        ctrl.select_image("b.jpg");
        assert!(ctrl.result().is_none());
        assert_eq!(ctrl.phase(), DemoPhase::Collecting);
    }

    #[test]
    fn test_reply_after_image_swap_is_dropped() {
        let refreshes = Refreshes::default();
        let mut ctrl = DemoController::new(Modality::Detect);
        ctrl.select_image("a.jpg");
        let call = ctrl.begin(&VisionConfig::default(), &token()).unwrap();
        ctrl.clear_image();
        ctrl.select_image("b.jpg");
        assert!(ctrl.is_busy());

        let err = ctrl
            .complete(call.request_id, ok_detect(), Some("u"), &refreshes)
            .unwrap_err();
        assert_eq!(err, DemoError::Superseded);
        assert!(ctrl.result().is_none());
        assert!(refreshes.0.borrow().is_empty());
        assert!(!ctrl.is_busy());
        assert_eq!(ctrl.phase(), DemoPhase::Collecting);

        let call = ctrl.begin(&VisionConfig::default(), &token()).unwrap();
        ctrl.complete(call.request_id, ok_detect(), Some("u"), &refreshes)
            .unwrap();
        assert!(ctrl.result().is_some());
    }

    #[test]
    fn test_reply_to_unknown_request_changes_nothing() {
        let mut ctrl = DemoController::new(Modality::Detect);
        ctrl.select_image("a.jpg");
        ctrl.begin(&VisionConfig::default(), &token()).unwrap();
        let err = ctrl
            .complete(Uuid::new_v4(), ok_detect(), None, &Refreshes::default())
            .unwrap_err();
        assert_eq!(err, DemoError::Superseded);
        assert!(ctrl.is_busy());
        assert!(ctrl.result().is_none());
    }

    #[test]
    fn test_replace_labels_drops_defaults() {
        let mut ctrl = DemoController::<&str>::new(Modality::Classify);
        ctrl.replace_labels(["jacket", "coat"].into_iter().collect());
        assert_eq!(ctrl.input().labels.joined(), "jacket,coat");
        assert_eq!(ctrl.phase(), DemoPhase::Collecting);
    }

    #[test]
    fn test_weighting_is_capped() {
        let mut ctrl = DemoController::<&str>::new(Modality::Search);
        ctrl.set_weighting(250);
        assert_eq!(ctrl.input().weighting, 100);
    }
}
