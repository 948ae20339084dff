use futures::executor::block_on;
use shared::{
    CreditsRefresher, DemoController, DemoError, DemoResult, HttpReply, Modality, Submission,
    Transport, TransportError, ValidationError, VisionConfig, submit,
};
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::future::Future;

type Image = &'static str;

/// Replays canned replies and records what would have gone on the wire.
struct ScriptedTransport {
    replies: RefCell<VecDeque<Result<HttpReply, TransportError>>>,
    sent: RefCell<Vec<Submission<Image>>>,
}

impl ScriptedTransport {
    fn new(replies: Vec<Result<HttpReply, TransportError>>) -> Self {
        Self {
            replies: RefCell::new(replies.into()),
            sent: RefCell::new(Vec::new()),
        }
    }

    fn sent_count(&self) -> usize {
        self.sent.borrow().len()
    }
}

impl Transport<Image> for ScriptedTransport {
    fn post(
        &self,
        submission: &Submission<Image>,
    ) -> impl Future<Output = Result<HttpReply, TransportError>> {
        self.sent.borrow_mut().push(submission.clone());
        let reply = self
            .replies
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::Network("no scripted reply".into())));
        async move { reply }
    }
}

#[derive(Default)]
struct CountingCredits(Cell<usize>);

impl CreditsRefresher for CountingCredits {
    fn refresh(&self, _user_id: &str) {
        self.0.set(self.0.get() + 1);
    }
}

fn reply(status: u16, body: &str) -> Result<HttpReply, TransportError> {
    Ok(HttpReply {
        status,
        body: body.to_string(),
    })
}

fn token() -> Option<String> {
    Some("bearer-token".to_string())
}

#[test]
fn missing_image_never_reaches_the_network() {
    let config = VisionConfig::default();
    let credits = CountingCredits::default();
    for modality in [Modality::Segment, Modality::Classify, Modality::Detect] {
        let transport = ScriptedTransport::new(vec![reply(200, "{}")]);
        let mut ctrl = DemoController::<Image>::new(modality);
        let err = block_on(submit(
            &mut ctrl,
            &config,
            &token(),
            &transport,
            Some("u"),
            &credits,
        ))
        .unwrap_err();
        assert_eq!(err, DemoError::Validation(ValidationError::MissingImage));
        assert_eq!(transport.sent_count(), 0);
    }
    assert_eq!(credits.0.get(), 0);
}

#[test]
fn combined_search_sends_weighting_as_alpha() {
    let config = VisionConfig::default();
    let transport = ScriptedTransport::new(vec![reply(
        200,
        r#"{"results":[{"label":"robe rouge","score":0.93,"image_path":"images/1.jpg"}]}"#,
    )]);
    let credits = CountingCredits::default();
    let mut ctrl = DemoController::new(Modality::Search);
    ctrl.select_image("look.jpg");
    ctrl.set_text("robe rouge élégante");
    ctrl.set_weighting(70);

    let result = block_on(submit(
        &mut ctrl,
        &config,
        &token(),
        &transport,
        Some("user-42"),
        &credits,
    ))
    .unwrap();

    let sent = transport.sent.borrow();
    let payload = &sent[0].payload;
    assert_eq!(payload.text_field("alpha"), Some("0.7"));
    assert_eq!(payload.text_field("top_k"), Some("6"));
    assert_eq!(payload.text_field("text"), Some("robe rouge élégante"));
    assert_eq!(payload.file_field("image"), Some(&"look.jpg"));
    assert_eq!(sent[0].bearer_token.as_deref(), Some("bearer-token"));
    assert_eq!(sent[0].url.as_str(), "http://localhost:8000/api/v1/search/");
    assert!(matches!(result, DemoResult::Search(_)));
    assert_eq!(credits.0.get(), 1);
}

#[test]
fn quota_exhaustion_leaves_results_and_credits_alone() {
    let config = VisionConfig::default();
    let transport = ScriptedTransport::new(vec![
        reply(200, r#"{"results":[{"label":"robe","score":0.81}]}"#),
        reply(402, r#"{"detail":"Plus de crédits"}"#),
    ]);
    let credits = CountingCredits::default();
    let mut ctrl = DemoController::new(Modality::Classify);
    ctrl.select_image("look.jpg");

    block_on(submit(&mut ctrl, &config, &token(), &transport, Some("u"), &credits)).unwrap();
    let shown = ctrl.result().cloned();

    let err = block_on(submit(&mut ctrl, &config, &token(), &transport, Some("u"), &credits))
        .unwrap_err();
    assert_eq!(err, DemoError::QuotaExceeded);
    assert_eq!(ctrl.result().cloned(), shown);
    assert_eq!(credits.0.get(), 1);
    assert_eq!(transport.sent_count(), 2);
}

#[test]
fn unauthenticated_call_is_aborted() {
    let transport = ScriptedTransport::new(vec![reply(200, r#"{"detected_objects":[]}"#)]);
    let mut ctrl = DemoController::new(Modality::Detect);
    ctrl.select_image("look.jpg");
    let err = block_on(submit(
        &mut ctrl,
        &VisionConfig::default(),
        &None::<String>,
        &transport,
        None,
        &CountingCredits::default(),
    ))
    .unwrap_err();
    assert_eq!(err, DemoError::Unauthenticated);
    assert_eq!(transport.sent_count(), 0);
}

#[test]
fn network_failure_is_reported_and_button_released() {
    let transport = ScriptedTransport::new(vec![Err(TransportError::Network(
        "connection refused".into(),
    ))]);
    let mut ctrl = DemoController::new(Modality::Segment);
    ctrl.select_image("look.jpg");
    let err = block_on(submit(
        &mut ctrl,
        &VisionConfig::default(),
        &token(),
        &transport,
        Some("u"),
        &CountingCredits::default(),
    ))
    .unwrap_err();
    assert!(matches!(err, DemoError::Transport(TransportError::Network(_))));
    assert!(!ctrl.is_busy());
    assert!(ctrl.result().is_none());
}

#[test]
fn classify_sends_comma_joined_labels() {
    let transport = ScriptedTransport::new(vec![reply(
        200,
        r#"{"results":[{"label":"t-shirt","score":0.42},{"label":"robe","score":0.81}]}"#,
    )]);
    let mut ctrl = DemoController::new(Modality::Classify);
    ctrl.select_image("look.jpg");
    for label in ["pull", "pantalon", "veste"] {
        ctrl.remove_label(label);
    }
    let result = block_on(submit(
        &mut ctrl,
        &VisionConfig::default(),
        &token(),
        &transport,
        None,
        &CountingCredits::default(),
    ))
    .unwrap();

    assert_eq!(
        transport.sent.borrow()[0].payload.text_field("labels"),
        Some("t-shirt,robe")
    );
    let DemoResult::Classify(classify) = result else {
        panic!("expected a classification result");
    };
    assert_eq!(classify.top_badge().as_deref(), Some("robe (81.0%)"));
    assert_eq!(classify.bars()[0].percent, "81.0%");
}

#[test]
fn image_swapped_mid_flight_hides_the_late_reply() {
    let config = VisionConfig::default();
    let transport = ScriptedTransport::new(vec![
        reply(200, r#"{"detected_objects":[{"label":"dress","score":0.9,"box":[1,2,30,40]}]}"#),
        reply(200, r#"{"detected_objects":[]}"#),
    ]);
    let credits = CountingCredits::default();
    let mut ctrl = DemoController::new(Modality::Detect);
    ctrl.select_image("first.jpg");

    let call = ctrl.begin(&config, &token()).unwrap();
    ctrl.clear_image();
    ctrl.select_image("second.jpg");
    let outcome = block_on(transport.post(&call));
    let err = ctrl
        .complete(call.request_id, outcome, Some("u"), &credits)
        .unwrap_err();

    assert_eq!(err, DemoError::Superseded);
    assert!(ctrl.result().is_none());
    assert!(!ctrl.is_busy());
    assert_eq!(credits.0.get(), 0);

    let result = block_on(submit(&mut ctrl, &config, &token(), &transport, Some("u"), &credits))
        .unwrap();
    assert_eq!(transport.sent.borrow()[1].payload.file_field("image"), Some(&"second.jpg"));
    let DemoResult::Detect(detect) = result else {
        panic!("expected a detection result");
    };
    assert!(detect.detected_objects.is_empty());
    assert_eq!(credits.0.get(), 1);
}
