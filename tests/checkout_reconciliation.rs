//! Integration tests for the enrollment/checkout/webhook flow.
//!
//! Exercises the command handlers end-to-end over in-memory adapters and
//! the mock payment provider: enroll, checkout (free and paid), provider
//! callback reconciliation, and the duplicate/invalid delivery cases.

use std::sync::Arc;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::json;

use courseloom::adapters::memory::{
    InMemoryCourseStore, InMemoryEnrollmentRepository, InMemoryPaymentRepository,
};
use courseloom::adapters::stripe::MockPaymentProvider;
use courseloom::application::handlers::checkout::{
    CheckoutOutcome, CreateCheckoutSessionCommand, CreateCheckoutSessionHandler,
};
use courseloom::application::handlers::enrollment::{EnrollCommand, EnrollHandler};
use courseloom::application::handlers::webhook::{
    ProcessWebhookCommand, ProcessWebhookHandler, ProcessWebhookResult,
};
use courseloom::domain::catalog::Course;
use courseloom::domain::enrollment::Enrollment;
use courseloom::domain::foundation::{Actor, Role, UserId};
use courseloom::domain::payment::{PaymentStatus, WebhookError, PROVIDER_FREE};
use courseloom::ports::{EnrollmentRepository, PaymentRepository};

const WEBHOOK_SECRET: &str = "whsec_integration_secret";

// =============================================================================
// Test Infrastructure
// =============================================================================

struct TestApp {
    course_store: Arc<InMemoryCourseStore>,
    enrollments: Arc<InMemoryEnrollmentRepository>,
    payments: Arc<InMemoryPaymentRepository>,
    provider: Arc<MockPaymentProvider>,
}

impl TestApp {
    fn new() -> Self {
        Self {
            course_store: Arc::new(InMemoryCourseStore::new()),
            enrollments: Arc::new(InMemoryEnrollmentRepository::new()),
            payments: Arc::new(InMemoryPaymentRepository::new()),
            provider: Arc::new(MockPaymentProvider::new(WEBHOOK_SECRET)),
        }
    }

    fn enroll_handler(&self) -> EnrollHandler {
        EnrollHandler::new(self.course_store.clone(), self.enrollments.clone())
    }

    fn checkout_handler(&self) -> CreateCheckoutSessionHandler {
        CreateCheckoutSessionHandler::new(
            self.enrollments.clone(),
            self.payments.clone(),
            self.course_store.clone(),
            self.provider.clone(),
            "https://app.test/success",
            "https://app.test/cancel",
        )
    }

    fn webhook_handler(&self) -> ProcessWebhookHandler {
        ProcessWebhookHandler::new(
            self.provider.clone(),
            self.payments.clone(),
            self.enrollments.clone(),
        )
    }

    async fn seed_course(&self, price: Decimal) -> Course {
        let course = Course::new(UserId::new(), "Practical Rust", price).unwrap();
        self.course_store.insert_course(course.clone()).await;
        course
    }

    async fn enroll(&self, course: &Course) -> Enrollment {
        let student = Actor::new(UserId::new(), Role::Student);
        self.enroll_handler()
            .handle(EnrollCommand { course_id: course.id }, Some(&student))
            .await
            .unwrap()
    }

    async fn checkout(&self, enrollment: &Enrollment) -> CheckoutOutcome {
        let student = Actor::new(UserId::new(), Role::Student);
        self.checkout_handler()
            .handle(
                CreateCheckoutSessionCommand {
                    enrollment_id: enrollment.id,
                    success_url: None,
                    cancel_url: None,
                },
                Some(&student),
            )
            .await
            .unwrap()
    }

    fn checkout_completed_event(&self, session_id: &str, enrollment: &Enrollment) -> (Vec<u8>, String) {
        let body = serde_json::to_vec(&json!({
            "id": format!("evt_{}", session_id),
            "type": "checkout.session.completed",
            "created": chrono::Utc::now().timestamp(),
            "data": {
                "object": {
                    "id": session_id,
                    "payment_intent": format!("pi_{}", session_id),
                    "metadata": { "enrollment_id": enrollment.id.to_string() }
                }
            },
            "livemode": false
        }))
        .unwrap();
        let signature = self.provider.sign(&body);
        (body, signature)
    }
}

// =============================================================================
// End-to-End Flows
// =============================================================================

#[tokio::test]
async fn paid_course_checkout_then_webhook_reconciles_everything() {
    let app = TestApp::new();
    let course = app.seed_course(dec!(49.99)).await;
    let enrollment = app.enroll(&course).await;

    // Checkout: pending payment referencing the session, URL returned.
    let outcome = app.checkout(&enrollment).await;

    let session_id = match outcome {
        CheckoutOutcome::Hosted { url, session_id } => {
            assert!(url.contains(&session_id));
            session_id
        }
        other => panic!("expected hosted checkout, got {:?}", other),
    };

    let pending = app
        .payments
        .find_by_provider_reference(&session_id)
        .await
        .unwrap()
        .expect("pending payment must exist before any webhook");
    assert_eq!(pending.status, PaymentStatus::Pending);
    assert_eq!(pending.amount, dec!(49.99));

    // Provider completes the session asynchronously.
    let (body, signature) = app.checkout_completed_event(&session_id, &enrollment);
    let result = app
        .webhook_handler()
        .handle(ProcessWebhookCommand {
            payload: body,
            signature,
        })
        .await
        .unwrap();
    assert_eq!(result, ProcessWebhookResult::Reconciled);

    // Payment succeeded, reference finalized to the payment intent.
    let settled = app.payments.find_by_id(&pending.id).await.unwrap().unwrap();
    assert_eq!(settled.status, PaymentStatus::Succeeded);
    assert_eq!(
        settled.provider_reference.as_deref(),
        Some(format!("pi_{}", session_id).as_str())
    );

    // Enrollment unlocked.
    let paid = app.enrollments.find_by_id(&enrollment.id).await.unwrap().unwrap();
    assert!(paid.paid);
}

#[tokio::test]
async fn free_course_checkout_settles_without_provider() {
    let app = TestApp::new();
    let course = app.seed_course(Decimal::ZERO).await;
    let enrollment = app.enroll(&course).await;

    let outcome = app.checkout(&enrollment).await;

    assert!(matches!(outcome, CheckoutOutcome::Free { ref enrollment } if enrollment.paid));

    let ledger = app.payments.list_by_enrollment(&enrollment.id).await.unwrap();
    assert_eq!(ledger.len(), 1);
    assert_eq!(ledger[0].amount, Decimal::ZERO);
    assert_eq!(ledger[0].provider, PROVIDER_FREE);
    assert_eq!(ledger[0].status, PaymentStatus::Succeeded);
}

#[tokio::test]
async fn duplicate_webhook_delivery_is_idempotent() {
    let app = TestApp::new();
    let course = app.seed_course(dec!(19.00)).await;
    let enrollment = app.enroll(&course).await;

    let outcome = app.checkout(&enrollment).await;
    let session_id = match outcome {
        CheckoutOutcome::Hosted { session_id, .. } => session_id,
        other => panic!("expected hosted checkout, got {:?}", other),
    };

    let (body, signature) = app.checkout_completed_event(&session_id, &enrollment);
    let cmd = ProcessWebhookCommand {
        payload: body,
        signature,
    };

    app.webhook_handler().handle(cmd.clone()).await.unwrap();
    let first = app
        .payments
        .find_latest_by_enrollment(&enrollment.id)
        .await
        .unwrap()
        .unwrap();

    // Same event delivered again: state unchanged, still acknowledged.
    let result = app.webhook_handler().handle(cmd).await.unwrap();
    assert_eq!(result, ProcessWebhookResult::Reconciled);

    let second = app
        .payments
        .find_latest_by_enrollment(&enrollment.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(first.status, second.status);
    assert_eq!(first.provider_reference, second.provider_reference);

    let ledger = app.payments.list_by_enrollment(&enrollment.id).await.unwrap();
    assert_eq!(ledger.len(), 1);
}

#[tokio::test]
async fn forged_webhook_is_rejected_and_mutates_nothing() {
    let app = TestApp::new();
    let course = app.seed_course(dec!(19.00)).await;
    let enrollment = app.enroll(&course).await;

    let outcome = app.checkout(&enrollment).await;
    let session_id = match outcome {
        CheckoutOutcome::Hosted { session_id, .. } => session_id,
        other => panic!("expected hosted checkout, got {:?}", other),
    };

    // Signed by an attacker who does not hold the webhook secret.
    let forger = MockPaymentProvider::new("whsec_attacker");
    let (body, _) = app.checkout_completed_event(&session_id, &enrollment);
    let forged_signature = forger.sign(&body);

    let err = app
        .webhook_handler()
        .handle(ProcessWebhookCommand {
            payload: body,
            signature: forged_signature,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, WebhookError::InvalidSignature));

    let payment = app
        .payments
        .find_by_provider_reference(&session_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(payment.status, PaymentStatus::Pending);

    let stored = app.enrollments.find_by_id(&enrollment.id).await.unwrap().unwrap();
    assert!(!stored.paid);
}

#[tokio::test]
async fn enroll_is_idempotent_per_student_course_pair() {
    let app = TestApp::new();
    let course = app.seed_course(dec!(10.00)).await;
    let student = Actor::new(UserId::new(), Role::Student);

    let first = app
        .enroll_handler()
        .handle(EnrollCommand { course_id: course.id }, Some(&student))
        .await
        .unwrap();
    let second = app
        .enroll_handler()
        .handle(EnrollCommand { course_id: course.id }, Some(&student))
        .await
        .unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(app.enrollments.count().await, 1);
}

#[tokio::test]
async fn unknown_event_types_are_acknowledged_and_ignored() {
    let app = TestApp::new();

    let body = serde_json::to_vec(&json!({
        "id": "evt_future",
        "type": "invoice.upcoming",
        "created": chrono::Utc::now().timestamp(),
        "data": { "object": { "id": "in_1" } },
        "livemode": false
    }))
    .unwrap();
    let signature = app.provider.sign(&body);

    let result = app
        .webhook_handler()
        .handle(ProcessWebhookCommand {
            payload: body,
            signature,
        })
        .await
        .unwrap();

    assert_eq!(result, ProcessWebhookResult::Ignored);
}

#[tokio::test]
async fn webhook_for_unknown_references_is_acknowledged() {
    let app = TestApp::new();
    let ghost = Enrollment::new(UserId::new(), courseloom::domain::foundation::CourseId::new());

    let (body, signature) = app.checkout_completed_event("cs_untracked", &ghost);

    let result = app
        .webhook_handler()
        .handle(ProcessWebhookCommand {
            payload: body,
            signature,
        })
        .await
        .unwrap();

    assert_eq!(result, ProcessWebhookResult::Acknowledged);
}
