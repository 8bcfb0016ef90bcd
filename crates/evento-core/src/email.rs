// Outbound email payloads and the templates that produce them
//
// Templates render the full message here; transport (SMTP vs mock) is the
// mailer crate's concern.

use crate::domain::{EventRecord, StudentRecord};

/// A rendered email ready for the dispatcher
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundEmail {
    pub to: String,
    pub to_name: String,
    pub subject: String,
    pub html: String,
}

fn layout(heading: &str, body: &str) -> String {
    format!(
        "<div style=\"font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;\">\
         <div style=\"background: #830000; color: white; padding: 20px; text-align: center;\">\
         <h2>{heading}</h2></div>\
         <div style=\"padding: 20px; background: #f9f9f9;\">{body}</div></div>"
    )
}

fn event_details(event: &EventRecord) -> String {
    format!(
        "<h3 style=\"color: #830000;\">{}</h3>\
         <p><strong>Date:</strong> {}</p>\
         <p><strong>Venue:</strong> {}</p>",
        event.name,
        event.date.format("%d %b %Y, %H:%M"),
        event.venue
    )
}

/// Templates for every mail the system sends
pub mod templates {
    use super::*;

    pub fn registration_confirmation(student: &StudentRecord, event: &EventRecord) -> OutboundEmail {
        OutboundEmail {
            to: student.email.clone(),
            to_name: student.name.clone(),
            subject: format!("Registration Confirmed: {}", event.name),
            html: layout(
                "Registration Confirmation",
                &format!(
                    "<p>Dear {},</p>\
                     <p>You have successfully registered for the following event:</p>{}\
                     <p>We look forward to seeing you there!</p>",
                    student.name,
                    event_details(event)
                ),
            ),
        }
    }

    pub fn waitlist_joined(student: &StudentRecord, event: &EventRecord) -> OutboundEmail {
        OutboundEmail {
            to: student.email.clone(),
            to_name: student.name.clone(),
            subject: format!("Waitlisted: {}", event.name),
            html: layout(
                "You're on the waitlist",
                &format!(
                    "<p>Dear {},</p>\
                     <p><strong>{}</strong> is currently full, so you have been added to the \
                     waitlist. We will notify you as soon as a seat opens up.</p>",
                    student.name, event.name
                ),
            ),
        }
    }

    pub fn waitlist_promoted(student: &StudentRecord, event: &EventRecord) -> OutboundEmail {
        OutboundEmail {
            to: student.email.clone(),
            to_name: student.name.clone(),
            subject: format!("Seat Confirmed: {}", event.name),
            html: layout(
                "A seat opened up!",
                &format!(
                    "<p>Dear {},</p>\
                     <p>Good news - a seat opened up and you have been moved from the waitlist \
                     into the participant list:</p>{}",
                    student.name,
                    event_details(event)
                ),
            ),
        }
    }

    pub fn event_reminder(student: &StudentRecord, event: &EventRecord) -> OutboundEmail {
        OutboundEmail {
            to: student.email.clone(),
            to_name: student.name.clone(),
            subject: format!("Event Reminder: {}", event.name),
            html: layout(
                "Event Notification",
                &format!(
                    "<p>Dear {},</p>\
                     <p>This is a reminder for the upcoming event you have registered for:</p>{}\
                     <p><strong>Description:</strong> {}</p>",
                    student.name,
                    event_details(event),
                    event.description
                ),
            ),
        }
    }

    pub fn event_updated(student: &StudentRecord, event_name: &str, changes: &[String]) -> OutboundEmail {
        let items: String = changes
            .iter()
            .map(|c| format!("<li>{c}</li>"))
            .collect();
        OutboundEmail {
            to: student.email.clone(),
            to_name: student.name.clone(),
            subject: format!("Event Updated: {event_name}"),
            html: layout(
                "Event Update",
                &format!(
                    "<p>Dear {},</p>\
                     <p>Details of <strong>{event_name}</strong> have changed:</p><ul>{items}</ul>",
                    student.name
                ),
            ),
        }
    }

    pub fn event_rejected(
        organizer_name: &str,
        organizer_email: &str,
        event_name: &str,
        reason: &str,
    ) -> OutboundEmail {
        OutboundEmail {
            to: organizer_email.to_owned(),
            to_name: organizer_name.to_owned(),
            subject: format!("Event Rejected: {event_name}"),
            html: layout(
                "Event Rejected",
                &format!(
                    "<p>Dear {organizer_name},</p>\
                     <p>Your event <strong>{event_name}</strong> was not approved.</p>\
                     <p><strong>Reason:</strong> {reason}</p>"
                ),
            ),
        }
    }

    pub fn feedback_request(student: &StudentRecord, event_name: &str) -> OutboundEmail {
        OutboundEmail {
            to: student.email.clone(),
            to_name: student.name.clone(),
            subject: format!("How was {event_name}?"),
            html: layout(
                "We'd love your feedback!",
                &format!(
                    "<p>Dear {},</p>\
                     <p>Thank you for attending <strong>{event_name}</strong>. We would \
                     appreciate if you could take a moment to rate the event.</p>",
                    student.name
                ),
            ),
        }
    }
}
