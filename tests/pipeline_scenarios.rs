use base64::{engine::general_purpose, Engine as _};
use image::{DynamicImage, ImageOutputFormat, RgbImage};
use signlink::api::endpoints;
use signlink::core::exchange::{ExchangeState, GestureStatus};
use signlink::core::pipeline::{Backends, ErrorCode, FrameRecognizer, Outcome, RecognizerConfig, Verdict};
use signlink::core::vision::{Frame, Landmark, MockClassifier, MockHandLocalizer, RawFrame, RegionExtractor};
use std::io::Cursor;
use std::sync::Arc;
use std::time::{Duration, Instant};

fn config(skip_rate: u64) -> RecognizerConfig {
    RecognizerConfig {
        frame_skip_rate: skip_rate,
        cache_duration: Duration::from_millis(100),
        inference_timeout: None,
        ..Default::default()
    }
}

struct Harness {
    recognizer: FrameRecognizer,
    localizer: Arc<MockHandLocalizer>,
    classifier: Arc<MockClassifier>,
    exchange: Arc<ExchangeState>,
}

fn harness(config: RecognizerConfig, localizer: MockHandLocalizer, classifier: MockClassifier) -> Harness {
    let localizer = Arc::new(localizer);
    let classifier = Arc::new(classifier);
    let exchange = Arc::new(ExchangeState::new());
    let recognizer = FrameRecognizer::new(
        config,
        Backends::new(localizer.clone(), classifier.clone()),
        exchange.clone(),
    )
    .unwrap();
    Harness {
        recognizer,
        localizer,
        classifier,
        exchange,
    }
}

fn hand() -> MockHandLocalizer {
    MockHandLocalizer::with_hand(MockHandLocalizer::synthetic_hand(0.5, 0.5, 0.3))
}

fn frame(fill: u8) -> Frame {
    Frame::solid(160, 120, fill)
}

#[test]
fn scenario_a_no_hand_in_frame() {
    let h = harness(config(1), MockHandLocalizer::new(), MockClassifier::with_prediction(Some("A"), 0.9));
    let verdict = h.recognizer.recognize_frame(frame(10));

    assert!(!verdict.success);
    assert_eq!(verdict.error, Some(ErrorCode::NoHandsDetected));
    assert_eq!(verdict.outcome, Outcome::NoHands);
    assert!(!verdict.suggestions.is_empty());
    assert_eq!(h.classifier.predict_calls(), 0);
}

#[test]
fn scenario_b_confident_letter_is_accepted() {
    let h = harness(config(1), hand(), MockClassifier::with_prediction(Some("A"), 0.92));
    let verdict = h.recognizer.recognize_frame(frame(10));

    assert!(verdict.success);
    assert_eq!(verdict.label.as_deref(), Some("A"));
    assert_eq!(verdict.gesture.as_deref(), Some("A"));
    assert_eq!(verdict.confidence, 0.92);

    let gesture = h.exchange.latest_learner().unwrap();
    assert_eq!(gesture.status, GestureStatus::Recognized);
    assert_eq!(gesture.label.as_deref(), Some("A"));
}

#[test]
fn scenario_c_middling_letter_is_tentative() {
    let h = harness(config(1), hand(), MockClassifier::with_prediction(Some("B"), 0.40));
    let verdict = h.recognizer.recognize_frame(frame(10));

    assert!(!verdict.success);
    assert_eq!(verdict.outcome, Outcome::Tentative);
    assert_eq!(verdict.label.as_deref(), Some("B"));
    assert!(verdict.gesture.is_none());

    let gesture = h.exchange.latest_learner().unwrap();
    assert_eq!(gesture.status, GestureStatus::NotRecognized);
}

#[test]
fn scenario_d_no_label_is_rejected() {
    let h = harness(config(1), hand(), MockClassifier::with_prediction(None, 0.1));
    let verdict = h.recognizer.recognize_frame(frame(10));

    assert!(!verdict.success);
    assert_eq!(verdict.outcome, Outcome::Rejected);
    assert!(verdict.label.is_none());
    assert!(verdict.error.is_none());
}

#[test]
fn scenario_e_identical_frame_within_window_is_cached() {
    let h = harness(config(1), hand(), MockClassifier::with_prediction(Some("A"), 0.92));
    let t0 = Instant::now();

    let first = h.recognizer.recognize_frame_at(frame(42), t0);
    let second = h.recognizer.recognize_frame_at(frame(42), t0 + Duration::from_millis(80));

    assert!(!first.from_cache);
    assert!(second.from_cache);
    assert_eq!(second.cache_age_ms, Some(80));
    assert_eq!(second.label, first.label);
    assert_eq!(second.timestamp, first.timestamp);
    assert_eq!(h.classifier.predict_calls(), 1);
}

#[test]
fn expired_cache_entry_reclassifies() {
    let h = harness(config(1), hand(), MockClassifier::with_prediction(Some("A"), 0.92));
    let t0 = Instant::now();

    h.recognizer.recognize_frame_at(frame(42), t0);
    let later = h.recognizer.recognize_frame_at(frame(42), t0 + Duration::from_millis(150));

    assert!(!later.from_cache);
    assert_eq!(h.classifier.predict_calls(), 2);
}

#[test]
fn different_frame_misses_cache() {
    let h = harness(config(1), hand(), MockClassifier::with_prediction(Some("A"), 0.92));
    let t0 = Instant::now();

    h.recognizer.recognize_frame_at(frame(42), t0);
    let other = h.recognizer.recognize_frame_at(frame(200), t0 + Duration::from_millis(10));

    assert!(!other.from_cache);
    assert_eq!(h.classifier.predict_calls(), 2);
}

#[test]
fn skipped_frames_reuse_prior_verdict_without_classifying() {
    let h = harness(config(3), hand(), MockClassifier::with_prediction(Some("C"), 0.8));
    let t0 = Instant::now();

    // frames 1 and 2 have no history yet
    let first = h.recognizer.recognize_frame_at(frame(1), t0);
    assert_eq!(first.outcome, Outcome::Processing);
    assert!(first.frame_skipped);
    h.recognizer.recognize_frame_at(frame(2), t0);
    assert_eq!(h.classifier.predict_calls(), 0);

    let processed = h.recognizer.recognize_frame_at(frame(3), t0 + Duration::from_millis(10));
    assert_eq!(processed.label.as_deref(), Some("C"));
    assert_eq!(h.classifier.predict_calls(), 1);

    // distinct frames past the cache window, within the stale window
    for (offset, fill) in [(150, 4), (200, 5)] {
        let skipped = h.recognizer.recognize_frame_at(frame(fill), t0 + Duration::from_millis(offset));
        assert!(skipped.frame_skipped);
        assert_eq!(skipped.label, processed.label);
        assert_eq!(skipped.timestamp, processed.timestamp);
    }
    assert_eq!(h.classifier.predict_calls(), 1);

    let sixth = h.recognizer.recognize_frame_at(frame(6), t0 + Duration::from_millis(250));
    assert!(!sixth.frame_skipped);
    assert_eq!(sixth.frame_number, Some(6));
    assert_eq!(h.classifier.predict_calls(), 2);
}

#[test]
fn skipped_frame_after_stale_window_is_placeholder() {
    let h = harness(config(2), hand(), MockClassifier::with_prediction(Some("C"), 0.8));
    let t0 = Instant::now();

    h.recognizer.recognize_frame_at(frame(1), t0);
    h.recognizer.recognize_frame_at(frame(2), t0);
    let late = h.recognizer.recognize_frame_at(frame(3), t0 + Duration::from_millis(600));

    assert_eq!(late.outcome, Outcome::Processing);
    assert!(late.error.is_none());
    assert_eq!(late.message, Verdict::processing(3).message);
}

#[test]
fn malformed_hand_becomes_invalid_landmarks() {
    let broken = MockHandLocalizer::with_hand(vec![Landmark::new(0.5, 0.5, 0.0); 7]);
    let h = harness(config(1), broken, MockClassifier::with_prediction(Some("A"), 0.9));
    let verdict = h.recognizer.recognize_frame(frame(1));

    assert_eq!(verdict.error, Some(ErrorCode::InvalidLandmarks));
    assert_eq!(h.localizer.detect_calls(), 1);
    assert_eq!(h.classifier.predict_calls(), 0);
}

#[test]
fn region_is_never_empty() {
    let extractor = RegionExtractor::new();
    let frame = Frame::solid(50, 40, 0);
    let corners = [(0.0, 0.0), (1.0, 1.0), (0.0, 1.0), (0.999, 0.001), (0.5, 0.5)];

    for (x, y) in corners {
        let points = vec![Landmark::new(x, y, 0.0); 21];
        let region = extractor.extract(&frame, &points);
        let size = region.size();
        assert!(size.width > 0 && size.height > 0, "empty crop at ({}, {})", x, y);
        assert!(size.width <= 50 && size.height <= 40);
    }

    let untouched = extractor.extract(&frame, &[]);
    assert!(untouched.is_full_frame());
    assert_eq!(*untouched.image, frame);
}

#[test]
fn concurrent_frames_are_all_counted() {
    let h = Arc::new(harness(config(1), hand(), MockClassifier::with_prediction(Some("A"), 0.9)));
    let handles: Vec<_> = (0..8u8)
        .map(|i| {
            let h = Arc::clone(&h);
            std::thread::spawn(move || {
                for j in 0..10u8 {
                    h.recognizer.recognize_frame(frame(i.wrapping_mul(10).wrapping_add(j)));
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let status = h.recognizer.status();
    assert_eq!(status.performance.frame_counter, 80);
    assert_eq!(
        status.performance.classifications + status.performance.cache_hits,
        80
    );
}

#[test]
fn exchange_round_trip_through_endpoints() {
    let h = harness(config(1), hand(), MockClassifier::with_prediction(Some("A"), 0.92));
    h.recognizer.recognize_frame(frame(9));

    let poll: serde_json::Value = serde_json::from_str(&endpoints::latest_gesture(&h.exchange).body).unwrap();
    assert_eq!(poll["has_gesture"], true);
    assert_eq!(poll["gesture"], "A");
    assert_eq!(poll["status"], "recognized");

    let again: serde_json::Value = serde_json::from_str(&endpoints::latest_gesture(&h.exchange).body).unwrap();
    assert_eq!(poll, again);

    let write = endpoints::send_reply(&h.exchange, Some(r#"{"gesture": "B", "description": "Flat hand"}"#));
    assert_eq!(write.status, 200);
    let reply: serde_json::Value = serde_json::from_str(&endpoints::latest_reply(&h.exchange).body).unwrap();
    assert_eq!(reply["gesture"], "B");
    assert_eq!(reply["description"], "Flat hand");
}

fn jpeg_body(width: u32, height: u32) -> String {
    let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, image::Rgb([180, 140, 120])));
    let mut bytes = Cursor::new(Vec::new());
    image.write_to(&mut bytes, ImageOutputFormat::Jpeg(90)).unwrap();
    let encoded = general_purpose::STANDARD.encode(bytes.into_inner());
    format!(r#"{{"image": "data:image/jpeg;base64,{}"}}"#, encoded)
}

#[test]
fn encoded_image_is_classified_through_endpoint() {
    let h = harness(config(1), hand(), MockClassifier::with_prediction(Some("A"), 0.92));
    let body = jpeg_body(320, 240);

    let response = endpoints::classify(&h.recognizer, Some(&body));
    assert_eq!(response.status, 200);

    let json: serde_json::Value = serde_json::from_str(&response.body).unwrap();
    assert_eq!(json["success"], true);
    assert_eq!(json["letter"], "A");
    assert_eq!(json["gesture"], "A");
    assert_eq!(json["frame_number"], 1);
    assert_eq!(h.localizer.detect_calls(), 1);
    assert_eq!(h.classifier.predict_calls(), 1);
    assert_eq!(h.exchange.latest_learner().unwrap().label.as_deref(), Some("A"));
}

#[test]
fn camera_planes_are_classified() {
    let h = harness(config(1), hand(), MockClassifier::with_prediction(Some("L"), 0.81));
    let raw = RawFrame {
        width: 64,
        height: 48,
        y_plane: vec![120; 64 * 48],
        u_plane: vec![128; 32 * 24],
        v_plane: vec![128; 32 * 24],
    };

    let verdict = h.recognizer.recognize_raw(&raw);
    assert!(verdict.success);
    assert!(verdict.frame_processed);
    assert_eq!(verdict.label.as_deref(), Some("L"));
    assert_eq!(verdict.frame_number, Some(1));
    assert_eq!(h.classifier.predict_calls(), 1);

    let truncated = RawFrame {
        y_plane: vec![120; 10],
        ..raw
    };
    let rejected = h.recognizer.recognize_raw(&truncated);
    assert_eq!(rejected.error, Some(ErrorCode::ImageProcessingFailed));
    assert_eq!(h.classifier.predict_calls(), 1);
}
