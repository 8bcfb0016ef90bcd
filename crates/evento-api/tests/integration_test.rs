// Integration tests for the Evento API
// Run against a live server: cargo test --test integration_test -- --ignored

use evento_contracts::{
    AttendanceResponse, AttendanceRoster, Coordinator, Event, EventStatus, ListResponse,
    RegisterOutcome, RegisterResponse, Student, StudentEvents, SubmitFeedbackResponse,
    UnregisterOutcome, UnregisterResponse,
};
use serde_json::json;

const API_BASE_URL: &str = "http://localhost:8080";

#[tokio::test]
#[ignore] // Run with: cargo test --test integration_test -- --ignored
async fn test_full_event_workflow() {
    let client = reqwest::Client::new();

    println!("🧪 Testing full event workflow...");

    // Step 1: Create a coordinator
    println!("\n📝 Step 1: Creating coordinator...");
    let coordinator_response = client
        .post(format!("{}/v1/coordinators", API_BASE_URL))
        .json(&json!({
            "name": "Dr. Rao",
            "email": "rao@college.edu",
            "department": "CSE",
            "club_name": "Tech Club"
        }))
        .send()
        .await
        .expect("Failed to create coordinator");
    assert_eq!(coordinator_response.status(), 201);
    let coordinator: Coordinator = coordinator_response
        .json()
        .await
        .expect("Failed to parse coordinator");
    println!("✅ Created coordinator: {}", coordinator.id);

    // Step 2: Create an event with capacity 1
    println!("\n📅 Step 2: Creating event (max_participants = 1)...");
    let event_response = client
        .post(format!("{}/v1/events", API_BASE_URL))
        .json(&json!({
            "name": "Integration Hackathon",
            "description": "End-to-end workflow test event",
            "date": "2030-06-01T09:00:00Z",
            "venue": "Main Auditorium",
            "organizer_id": coordinator.id,
            "max_participants": 1
        }))
        .send()
        .await
        .expect("Failed to create event");
    assert_eq!(event_response.status(), 201);
    let event: Event = event_response.json().await.expect("Failed to parse event");
    println!("✅ Created event: {}", event.id);
    assert_eq!(event.status, EventStatus::Pending);

    // Step 3: Approve it
    println!("\n👍 Step 3: Approving event...");
    let approve_response = client
        .post(format!(
            "{}/v1/admin/events/{}/approve",
            API_BASE_URL, event.id
        ))
        .json(&json!({ "approved_by": coordinator.id }))
        .send()
        .await
        .expect("Failed to approve event");
    assert_eq!(approve_response.status(), 200);
    let approved: Event = approve_response
        .json()
        .await
        .expect("Failed to parse event");
    assert_eq!(approved.status, EventStatus::Approved);

    // Step 4: Create two students
    println!("\n🎓 Step 4: Creating students...");
    let mut students = Vec::new();
    for (name, reg) in [("Ada", "21CS001"), ("Grace", "21CS002")] {
        let response = client
            .post(format!("{}/v1/students", API_BASE_URL))
            .json(&json!({
                "name": name,
                "email": format!("{}@college.edu", name.to_lowercase()),
                "register_no": reg,
                "department": "CSE",
                "year": "3rd"
            }))
            .send()
            .await
            .expect("Failed to create student");
        assert_eq!(response.status(), 201);
        let student: Student = response.json().await.expect("Failed to parse student");
        println!("✅ Created student: {} ({})", name, student.id);
        students.push(student);
    }

    // Step 5: First registration takes the only seat
    println!("\n🪑 Step 5: Registering first student...");
    let register = |student_id| {
        let client = client.clone();
        async move {
            client
                .post(format!("{}/v1/events/{}/register", API_BASE_URL, event.id))
                .json(&json!({ "student_id": student_id }))
                .send()
                .await
                .expect("Failed to register")
        }
    };

    let first = register(students[0].id).await;
    assert_eq!(first.status(), 200);
    let first: RegisterResponse = first.json().await.expect("Failed to parse response");
    assert_eq!(first.outcome, RegisterOutcome::Registered);
    println!("✅ First student registered");

    // Step 6: Second registration lands on the waitlist
    println!("\n⏳ Step 6: Registering second student...");
    let second = register(students[1].id).await;
    assert_eq!(second.status(), 200);
    let second: RegisterResponse = second.json().await.expect("Failed to parse response");
    assert_eq!(second.outcome, RegisterOutcome::Waitlisted);
    println!("✅ Second student waitlisted");

    // Step 7: Re-registering is a conflict
    println!("\n🚫 Step 7: Duplicate registration...");
    let duplicate = register(students[0].id).await;
    assert_eq!(duplicate.status(), 409);
    println!("✅ Duplicate rejected with 409");

    // Step 8: Unregister the first; the waitlisted student is promoted
    println!("\n🔁 Step 8: Unregistering first student...");
    let unregister_response = client
        .post(format!(
            "{}/v1/events/{}/unregister",
            API_BASE_URL, event.id
        ))
        .json(&json!({ "student_id": students[0].id }))
        .send()
        .await
        .expect("Failed to unregister");
    assert_eq!(unregister_response.status(), 200);
    let unregistered: UnregisterResponse = unregister_response
        .json()
        .await
        .expect("Failed to parse response");
    assert_eq!(unregistered.outcome, UnregisterOutcome::Unregistered);
    assert_eq!(unregistered.promoted, Some(students[1].id));
    println!("✅ Waitlist head promoted: {:?}", unregistered.promoted);

    // Step 9: The promoted student's view shows a confirmed seat
    println!("\n👀 Step 9: Checking student events view...");
    let events_response = client
        .get(format!(
            "{}/v1/students/{}/events",
            API_BASE_URL, students[1].id
        ))
        .send()
        .await
        .expect("Failed to get student events");
    assert_eq!(events_response.status(), 200);
    let view: StudentEvents = events_response
        .json()
        .await
        .expect("Failed to parse student events");
    assert!(view.registered.iter().any(|e| e.id == event.id));
    assert!(view.waitlisted.is_empty());
    println!("✅ Promotion reflected in student view");

    // Step 10: Check in and read the roster
    println!("\n📋 Step 10: Attendance...");
    let mark_response = client
        .post(format!(
            "{}/v1/events/{}/attendance/{}",
            API_BASE_URL, event.id, students[1].id
        ))
        .send()
        .await
        .expect("Failed to mark attendance");
    assert_eq!(mark_response.status(), 200);
    let marked: AttendanceResponse = mark_response
        .json()
        .await
        .expect("Failed to parse attendance");
    assert!(marked.checked_in);

    let roster_response = client
        .get(format!(
            "{}/v1/events/{}/attendance",
            API_BASE_URL, event.id
        ))
        .send()
        .await
        .expect("Failed to get roster");
    assert_eq!(roster_response.status(), 200);
    let roster: AttendanceRoster = roster_response
        .json()
        .await
        .expect("Failed to parse roster");
    assert_eq!(roster.total_attended, 1);
    println!("✅ Roster shows 1 attendee of {}", roster.total_registered);

    // Step 11: Submit feedback, then submit again (conflict)
    println!("\n⭐ Step 11: Feedback...");
    let feedback = client
        .post(format!("{}/v1/events/{}/feedback", API_BASE_URL, event.id))
        .json(&json!({ "student_id": students[1].id, "rating": 5, "comment": "Great!" }))
        .send()
        .await
        .expect("Failed to submit feedback");
    assert_eq!(feedback.status(), 200);
    let recorded: SubmitFeedbackResponse =
        feedback.json().await.expect("Failed to parse feedback");
    assert_eq!(recorded.average_rating, 5.0);

    let again = client
        .post(format!("{}/v1/events/{}/feedback", API_BASE_URL, event.id))
        .json(&json!({ "student_id": students[1].id, "rating": 1 }))
        .send()
        .await
        .expect("Failed to submit feedback");
    assert_eq!(again.status(), 409);
    println!("✅ Duplicate feedback rejected");

    println!("\n🎉 All tests passed!");
}

#[tokio::test]
#[ignore]
async fn test_health_endpoint() {
    let client = reqwest::Client::new();

    println!("🏥 Testing health endpoint...");
    let response = client
        .get(format!("{}/health", API_BASE_URL))
        .send()
        .await
        .expect("Failed to call health endpoint");

    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    println!("✅ Health check: {:?}", body);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
#[ignore]
async fn test_openapi_spec() {
    let client = reqwest::Client::new();

    println!("📖 Testing OpenAPI spec endpoint...");
    let response = client
        .get(format!("{}/api-doc/openapi.json", API_BASE_URL))
        .send()
        .await
        .expect("Failed to get OpenAPI spec");

    assert_eq!(response.status(), 200);
    let spec: serde_json::Value = response.json().await.expect("Failed to parse spec");
    println!("✅ OpenAPI spec title: {}", spec["info"]["title"]);
    assert_eq!(spec["info"]["title"], "Evento API");
}

#[tokio::test]
#[ignore]
async fn test_event_listing_defaults_to_approved() {
    let client = reqwest::Client::new();

    let response = client
        .get(format!("{}/v1/events", API_BASE_URL))
        .send()
        .await
        .expect("Failed to list events");
    assert_eq!(response.status(), 200);
    let events: ListResponse<Event> = response.json().await.expect("Failed to parse events");
    assert!(events
        .data
        .iter()
        .all(|e| e.status == EventStatus::Approved));
}
