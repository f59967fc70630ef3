//! Demo reports for local development and UI work.
//!
//! Five field reports along the Indian coastline, three of which already
//! carry a review decision. Seeding replays those decisions through the
//! normal review workflow, so every invariant still holds.

use hazardwatch_core::catalog::{HazardType, MediaKind, Priority, Severity};
use hazardwatch_core::error::CoreError;
use hazardwatch_core::hazard::{Location, MediaFile, NewHazardEvent, Reporter};
use hazardwatch_core::review::ReviewAction;

/// A review decision to replay after inserting a demo report.
#[derive(Debug, Clone)]
pub struct DemoReview {
    pub action: ReviewAction,
    pub reviewer: &'static str,
    pub notes: Option<&'static str>,
}

#[derive(Debug, Clone)]
pub struct DemoEvent {
    pub draft: NewHazardEvent,
    pub review: Option<DemoReview>,
}

struct Fixture {
    tracking_id: &'static str,
    hazard_type: HazardType,
    severity: u8,
    priority: Priority,
    title: &'static str,
    description: &'static str,
    place: (&'static str, f64, f64),
    reporter: (&'static str, &'static str, &'static str, bool),
    media: &'static [(MediaKind, &'static str, &'static str)],
    confidence: u8,
    public_visibility: bool,
    review: Option<DemoReview>,
}

fn fixtures() -> Vec<Fixture> {
    vec![
        Fixture {
            tracking_id: "HR-001234",
            hazard_type: HazardType::Tsunami,
            severity: 5,
            priority: Priority::Critical,
            title: "Massive waves approaching Dwarka coast",
            description: "Observed extremely high waves approaching the coastline. Water level rising rapidly. Immediate evacuation recommended for coastal areas.",
            place: ("Dwarka Beach, Gujarat", 22.2394, 68.9685),
            reporter: ("Rajesh Patel", "+91 9876543210", "rajesh.patel@gmail.com", true),
            media: &[
                (
                    MediaKind::Image,
                    "https://images.unsplash.com/photo-1549480119-94776100c5c3?q=80&w=2070&auto=format&fit=crop",
                    "tsunami-waves-1.jpg",
                ),
                (
                    MediaKind::Video,
                    "https://images.unsplash.com/photo-1517590457682-1c251d187768?q=80&w=1932&auto=format&fit=crop",
                    "tsunami-video.mp4",
                ),
            ],
            confidence: 85,
            public_visibility: true,
            review: Some(DemoReview {
                action: ReviewAction::BeginReview,
                reviewer: "",
                notes: None,
            }),
        },
        Fixture {
            tracking_id: "HR-001235",
            hazard_type: HazardType::StormSurge,
            severity: 4,
            priority: Priority::High,
            title: "Storm surge warning - Chennai Port",
            description: "Strong winds and storm surge observed at Chennai Port. Several fishing boats struggling to return to harbor.",
            place: ("Chennai Port, Tamil Nadu", 13.1067, 80.3012),
            reporter: ("Captain S. Kumar", "+91 9123456789", "s.kumar@chennaiport.gov.in", true),
            media: &[
                (
                    MediaKind::Image,
                    "https://images.unsplash.com/photo-1502685973808-f4de3823485d?q=80&w=2070&auto=format&fit=crop",
                    "storm-surge-1.jpg",
                ),
            ],
            confidence: 92,
            public_visibility: true,
            review: Some(DemoReview {
                action: ReviewAction::Verify,
                reviewer: "Dr. A. Sharma",
                notes: Some("Verified by Coast Guard. Official storm surge warning issued."),
            }),
        },
        Fixture {
            tracking_id: "HR-001236",
            hazard_type: HazardType::HighWaves,
            severity: 3,
            priority: Priority::Medium,
            title: "High waves at Kovalam Beach",
            description: "Unusually high waves observed at Kovalam Beach. Tourists advised to maintain safe distance from shoreline.",
            place: ("Kovalam Beach, Kerala", 8.4004, 76.9787),
            reporter: (
                "Beach Resort Manager",
                "+91 9087654321",
                "manager@kovalamresort.com",
                false,
            ),
            media: &[],
            confidence: 67,
            public_visibility: false,
            review: None,
        },
        Fixture {
            tracking_id: "HR-001237",
            hazard_type: HazardType::Flooding,
            severity: 2,
            priority: Priority::Low,
            title: "Minor coastal flooding in Kolkata",
            description: "Water logging observed in low-lying coastal areas during high tide. Roads partially affected.",
            place: ("Salt Lake, Kolkata, West Bengal", 22.5958, 88.2636),
            reporter: ("Local Resident", "+91 9234567890", "resident@gmail.com", false),
            media: &[
                (
                    MediaKind::Image,
                    "https://images.unsplash.com/photo-1596707323136-23589b273d2a?q=80&w=1935&auto=format&fit=crop",
                    "minor-flooding.jpg",
                ),
            ],
            confidence: 45,
            public_visibility: false,
            review: Some(DemoReview {
                action: ReviewAction::MarkFalseAlarm,
                reviewer: "City Official",
                notes: Some("Normal tidal flooding. No emergency action required."),
            }),
        },
        Fixture {
            tracking_id: "HR-001238",
            hazard_type: HazardType::Erosion,
            severity: 3,
            priority: Priority::Medium,
            title: "Significant beach erosion at Goa",
            description: "Noticeable loss of sand and collapse of some dunes due to recent high tides. Local authorities are being informed.",
            place: ("Colva Beach, Goa", 15.2891, 73.9213),
            reporter: ("Environmentalist Group", "+91 9543210987", "goa.env@org.in", true),
            media: &[
                (
                    MediaKind::Image,
                    "https://images.unsplash.com/photo-1549495400-058869151759?q=80&w=2070&auto=format&fit=crop",
                    "erosion-goa.jpg",
                ),
            ],
            confidence: 75,
            public_visibility: true,
            review: None,
        },
    ]
}

/// Build the demo set, oldest report first.
pub fn demo_events() -> Result<Vec<DemoEvent>, CoreError> {
    let mut events = fixtures()
        .into_iter()
        .map(|f| {
            let (place, latitude, longitude) = f.place;
            let (name, phone, email, verified) = f.reporter;
            Ok(DemoEvent {
                draft: NewHazardEvent {
                    id: None,
                    tracking_id: Some(f.tracking_id.to_string()),
                    hazard_type: f.hazard_type,
                    severity: Severity::new(f.severity)?,
                    priority: f.priority,
                    title: f.title.to_string(),
                    description: f.description.to_string(),
                    location: Location {
                        latitude,
                        longitude,
                        name: place.to_string(),
                    },
                    reporter: Reporter {
                        name: name.to_string(),
                        phone: Some(phone.to_string()),
                        email: Some(email.to_string()),
                        verified,
                    },
                    confidence: f.confidence,
                    affected_people: None,
                    affected_areas: vec![],
                    media: f
                        .media
                        .iter()
                        .map(|&(kind, url, name)| MediaFile {
                            kind,
                            url: url.to_string(),
                            name: name.to_string(),
                        })
                        .collect(),
                    public_visibility: f.public_visibility,
                },
                review: f.review,
            })
        })
        .collect::<Result<Vec<_>, CoreError>>()?;

    // Reports were filed newest first; insert oldest first so creation
    // order matches.
    events.reverse();
    Ok(events)
}
