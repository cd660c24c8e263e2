//! End-to-end reservation flow through the public API, with in-process
//! collaborator fakes standing in for the user and availability services.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};

use alcove::directory::SpaceDirectory;
use alcove::session::SessionValidator;
use alcove::{
    Booking, BookingError, BookingRequest, EngineConfig, Identity, ReservationEngine, Space,
    Window,
};

struct StaticDirectory {
    spaces: HashMap<String, Space>,
}

#[async_trait]
impl SpaceDirectory for StaticDirectory {
    async fn fetch(&self, space_id: &str) -> Result<Space, BookingError> {
        self.spaces
            .get(space_id)
            .cloned()
            .ok_or(BookingError::NotFound("space"))
    }
}

/// Sessions are valid for a fixed set of user ids.
struct SessionTable {
    active: Vec<i64>,
}

#[async_trait]
impl SessionValidator for SessionTable {
    async fn validate(&self, user_id: i64) -> Result<(), BookingError> {
        if self.active.contains(&user_id) {
            Ok(())
        } else {
            Err(BookingError::Auth("session expired or unknown user".into()))
        }
    }
}

fn engine() -> ReservationEngine {
    let directory = StaticDirectory {
        spaces: HashMap::from([(
            "A-101".to_string(),
            Space {
                space_id: "A-101".into(),
                capacity: 20,
                open_time: NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
                close_time: NaiveTime::from_hms_opt(22, 0, 0).unwrap(),
            },
        )]),
    };
    ReservationEngine::new(
        Arc::new(directory),
        Arc::new(SessionTable { active: vec![7, 13] }),
        EngineConfig::default(),
    )
}

fn at(h: u32, m: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 14, h, m, 0).unwrap()
}

fn day() -> NaiveDate {
    alcove::model::parse_date("2025-03-14").unwrap()
}

fn request(user_id: i64, start: DateTime<Utc>, end: DateTime<Utc>) -> BookingRequest {
    BookingRequest {
        space_id: "A-101".into(),
        date: day(),
        user_id,
        occupants: 5,
        window: Window::new(start, end),
    }
}

#[tokio::test]
async fn full_reservation_lifecycle() {
    let engine = engine();
    let alice = Identity::new("alice", 7);

    // Reserve, read back, verify the record round-trips as wire JSON.
    let id = engine
        .reserve(&alice, request(7, at(9, 0), at(11, 0)))
        .await
        .unwrap();
    let booking = engine.get(day(), id).await.unwrap();
    assert_eq!(booking.booking_id, id);

    let json = serde_json::to_string(&booking).unwrap();
    let parsed: Booking = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, booking);

    // A second user cannot take an overlapping slot...
    let bob = Identity::new("bob", 13);
    let denied = engine.reserve(&bob, request(13, at(10, 0), at(12, 0))).await;
    assert_eq!(denied, Err(BookingError::Conflict(id)));

    // ...but can book back-to-back.
    let bob_id = engine
        .reserve(&bob, request(13, at(11, 0), at(12, 0)))
        .await
        .unwrap();
    assert_ne!(bob_id, id);

    // Bob cannot cancel Alice's booking; Alice can.
    assert_eq!(
        engine.cancel(&bob, day(), id).await,
        Err(BookingError::Ownership)
    );
    engine.cancel(&alice, day(), id).await.unwrap();
    assert!(engine.get(day(), id).await.is_none());

    // The freed slot is immediately bookable by Bob.
    engine
        .reserve(&bob, request(13, at(9, 0), at(11, 0)))
        .await
        .unwrap();
}

#[tokio::test]
async fn logged_out_user_cannot_reserve() {
    let engine = engine();
    let stranger = Identity::new("carol", 99);
    let result = engine.reserve(&stranger, request(99, at(9, 0), at(11, 0))).await;
    assert!(matches!(result, Err(BookingError::Auth(_))));
    assert!(engine.get(day(), 1).await.is_none());
}

#[tokio::test]
async fn error_codes_are_transport_ready() {
    let engine = engine();
    let alice = Identity::new("alice", 7);

    let too_many = engine
        .reserve(&alice, request(7, at(9, 0), at(11, 0)))
        .await
        .map(|_| ())
        .and(
            engine
                .reserve(&alice, {
                    let mut r = request(7, at(14, 0), at(15, 0));
                    r.occupants = 21;
                    r
                })
                .await
                .map(|_| ()),
        );
    let err = too_many.unwrap_err();
    assert_eq!(err.code(), "CAPACITY");
    assert!(!err.is_retryable());
    assert!(err.to_string().contains("capacity"));
}
