//! In-memory complaint store
//!
//! The store exclusively owns every complaint. Callers get shared references
//! out and go through the operations below to change anything.

use crate::lexicon;
use crate::models::{Category, Complaint, ComplaintUpdate, NewComplaint, Status, Urgency};
use crate::validation::{validate_entry, validate_new_complaint, ValidationError};
use chrono::{DateTime, Duration, Utc};
use rand::distributions::Alphanumeric;
use rand::Rng;

const ID_PREFIX: &str = "CP-";
const ID_LEN: usize = 8;

#[derive(Debug, Default)]
pub struct ComplaintStore {
    complaints: Vec<Complaint>,
}

impl ComplaintStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// File a new complaint, stamped with the current time
    pub fn create(&mut self, input: NewComplaint) -> Result<&Complaint, ValidationError> {
        self.create_at(input, Utc::now())
    }

    /// File a new complaint with an explicit creation time.
    ///
    /// Nothing is inserted when validation fails. New complaints go to the
    /// front of the collection.
    pub fn create_at(
        &mut self,
        input: NewComplaint,
        timestamp: DateTime<Utc>,
    ) -> Result<&Complaint, ValidationError> {
        let (category, urgency) = validate_new_complaint(&input)?;

        let complaint = Complaint {
            id: self.generate_id(),
            title: input.title.trim().to_string(),
            description: input.description.trim().to_string(),
            category,
            dept: lexicon::department_for(category).name.to_string(),
            urgency,
            status: Status::Received,
            address: input.address.trim().to_string(),
            citizen_name: non_blank(input.citizen_name).unwrap_or_else(|| "Anonymous".to_string()),
            citizen_email: non_blank(input.citizen_email).unwrap_or_default(),
            phone: non_blank(input.phone).unwrap_or_default(),
            timestamp,
            updates: Vec::new(),
            notes: Vec::new(),
            reports: 1,
            is_emergency: input.is_emergency,
        };

        tracing::info!(
            "Complaint {} filed ({:?}, {:?}, emergency: {})",
            complaint.id,
            complaint.category,
            complaint.urgency,
            complaint.is_emergency
        );

        self.complaints.insert(0, complaint);
        Ok(&self.complaints[0])
    }

    /// Overwrite the status of a complaint. Returns the previous status, or
    /// `None` if the id is unknown.
    pub fn set_status(&mut self, id: &str, status: Status) -> Option<Status> {
        let complaint = self.get_mut(id)?;
        let previous = complaint.status;
        complaint.status = previous.transition_to(status);
        Some(previous)
    }

    /// Append a citizen-visible progress update.
    ///
    /// Blank text is rejected before the id is looked up; an unknown id is a
    /// silent no-op (`Ok(None)`).
    pub fn append_update(
        &mut self,
        id: &str,
        text: &str,
        author: &str,
    ) -> Result<Option<&Complaint>, ValidationError> {
        let text = validate_entry("update", text)?;
        let Some(complaint) = self.get_mut(id) else {
            return Ok(None);
        };
        complaint.updates.push(ComplaintUpdate {
            text: text.to_string(),
            author: author.to_string(),
            timestamp: Utc::now(),
        });
        Ok(Some(&*complaint))
    }

    /// Append an internal note. Same rules as `append_update`.
    pub fn append_note(
        &mut self,
        id: &str,
        text: &str,
    ) -> Result<Option<&Complaint>, ValidationError> {
        let text = validate_entry("note", text)?;
        let Some(complaint) = self.get_mut(id) else {
            return Ok(None);
        };
        complaint.notes.push(text.to_string());
        Ok(Some(&*complaint))
    }

    /// Complaints filed under this email OR this name, in store order
    pub fn find_by_identity(&self, name: &str, email: &str) -> Vec<&Complaint> {
        self.complaints
            .iter()
            .filter(|c| c.citizen_email == email || c.citizen_name == name)
            .collect()
    }

    pub fn get(&self, id: &str) -> Option<&Complaint> {
        self.complaints.iter().find(|c| c.id == id)
    }

    fn get_mut(&mut self, id: &str) -> Option<&mut Complaint> {
        self.complaints.iter_mut().find(|c| c.id == id)
    }

    /// All complaints, most recently filed first
    pub fn all(&self) -> &[Complaint] {
        &self.complaints
    }

    pub fn len(&self) -> usize {
        self.complaints.len()
    }

    fn generate_id(&self) -> String {
        let mut rng = rand::thread_rng();
        loop {
            let suffix: String = (&mut rng)
                .sample_iter(&Alphanumeric)
                .take(ID_LEN)
                .map(|b| char::from(b).to_ascii_uppercase())
                .collect();
            let id = format!("{}{}", ID_PREFIX, suffix);
            if self.get(&id).is_none() {
                return id;
            }
        }
    }

    /// Store preloaded with demonstration complaints, timed relative to `now`
    pub fn with_demo_data(now: DateTime<Utc>) -> Self {
        let mut store = Self::new();
        for seed in demo_complaints(now) {
            store.complaints.push(seed);
        }
        tracing::info!("Seeded {} demo complaints", store.len());
        store
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[allow(clippy::too_many_arguments)]
fn demo(
    id: &str,
    title: &str,
    description: &str,
    category: Category,
    urgency: Urgency,
    status: Status,
    address: &str,
    citizen: (&str, &str, &str),
    timestamp: DateTime<Utc>,
    reports: u32,
    is_emergency: bool,
) -> Complaint {
    Complaint {
        id: id.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        category,
        dept: lexicon::department_for(category).name.to_string(),
        urgency,
        status,
        address: address.to_string(),
        citizen_name: citizen.0.to_string(),
        citizen_email: citizen.1.to_string(),
        phone: citizen.2.to_string(),
        timestamp,
        updates: Vec::new(),
        notes: Vec::new(),
        reports,
        is_emergency,
    }
}

fn demo_complaints(now: DateTime<Utc>) -> Vec<Complaint> {
    let hydrant = demo(
        "CP-DEMO001",
        "Fire hydrant leaking heavily",
        "A fire hydrant on Elm Street is leaking water continuously, flooding the sidewalk and road.",
        Category::Water,
        Urgency::High,
        Status::Received,
        "456 Elm Street",
        ("Priya Sharma", "priya@example.com", "+91 98765-43210"),
        now - Duration::hours(1),
        1,
        true,
    );

    let mut streetlight = demo(
        "CP-DEMO002",
        "Street light electrocution risk",
        "Exposed wires on a fallen street light pole. Very dangerous, sparks visible at night.",
        Category::Electricity,
        Urgency::High,
        Status::InProgress,
        "789 Pine Road",
        ("Rahul Mehta", "rahul@example.com", "+91 87654-32109"),
        now - Duration::hours(12),
        2,
        true,
    );
    streetlight.updates.push(ComplaintUpdate {
        text: "Team dispatched to location".to_string(),
        author: "Power Dept".to_string(),
        timestamp: now - Duration::hours(6),
    });
    streetlight
        .notes
        .push("Requires immediate pole replacement".to_string());

    let mut pothole = demo(
        "CP-DEMO003",
        "Large pothole on Main Street",
        "There is a dangerous pothole on Main Street near the intersection with Oak Ave. Several cars have been damaged.",
        Category::Infrastructure,
        Urgency::Medium,
        Status::InProgress,
        "123 Main Street, Downtown",
        ("Anjali Desai", "anjali@example.com", "+91 76543-21098"),
        now - Duration::days(2),
        3,
        false,
    );
    pothole.updates.push(ComplaintUpdate {
        text: "Materials ordered, repair scheduled for next week".to_string(),
        author: "Public Works".to_string(),
        timestamp: now - Duration::days(1),
    });

    let garbage = demo(
        "CP-DEMO004",
        "Garbage pile not collected",
        "Garbage has been piling up on Gandhi Nagar Road for 5 days. Strong smell and attracting stray animals.",
        Category::Sanitation,
        Urgency::Medium,
        Status::Received,
        "Gandhi Nagar Road",
        ("Suresh Kumar", "suresh@example.com", "+91 65432-10987"),
        now - Duration::days(5),
        1,
        false,
    );

    vec![hydrant, streetlight, pothole, garbage]
}
