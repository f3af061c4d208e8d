//! Localized notification text.
//!
//! Titles and messages are rendered in the farm's locale. Two locales are
//! supported: English (`en`, the fallback) and Indonesian (`id`). System
//! announcements carry caller-provided text and skip this module.

// ---------------------------------------------------------------------------
// Locale
// ---------------------------------------------------------------------------

/// A supported interface language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Locale {
    #[default]
    En,
    Id,
}

impl Locale {
    /// Resolve a stored locale tag. Unknown tags fall back to English.
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "id" => Self::Id,
            _ => Self::En,
        }
    }
}

/// Rendered title and message for one notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationText {
    pub title: String,
    pub message: String,
}

// ---------------------------------------------------------------------------
// Templates
// ---------------------------------------------------------------------------

pub fn activity_reminder(locale: Locale, activity: &str, animal: &str) -> NotificationText {
    match locale {
        Locale::En => NotificationText {
            title: "Upcoming activity".to_string(),
            message: format!("\"{activity}\" for {animal} is due soon."),
        },
        Locale::Id => NotificationText {
            title: "Aktivitas akan datang".to_string(),
            message: format!("\"{activity}\" untuk {animal} segera jatuh tempo."),
        },
    }
}

pub fn schedule_reminder(locale: Locale, schedule: &str, animal: &str) -> NotificationText {
    match locale {
        Locale::En => NotificationText {
            title: "Upcoming schedule".to_string(),
            message: format!("Scheduled \"{schedule}\" for {animal} is due soon."),
        },
        Locale::Id => NotificationText {
            title: "Jadwal akan datang".to_string(),
            message: format!("Jadwal \"{schedule}\" untuk {animal} segera jatuh tempo."),
        },
    }
}

pub fn activity_overdue(
    locale: Locale,
    activity: &str,
    animal: &str,
    days_overdue: i64,
) -> NotificationText {
    match locale {
        Locale::En => NotificationText {
            title: "Overdue activity".to_string(),
            message: if days_overdue == 1 {
                format!("\"{activity}\" for {animal} is 1 day overdue.")
            } else {
                format!("\"{activity}\" for {animal} is {days_overdue} days overdue.")
            },
        },
        Locale::Id => NotificationText {
            title: "Aktivitas terlambat".to_string(),
            message: format!("\"{activity}\" untuk {animal} terlambat {days_overdue} hari."),
        },
    }
}

pub fn farm_invitation(locale: Locale, farm: &str) -> NotificationText {
    match locale {
        Locale::En => NotificationText {
            title: "Farm invitation".to_string(),
            message: format!("You have been invited to join {farm}."),
        },
        Locale::Id => NotificationText {
            title: "Undangan peternakan".to_string(),
            message: format!("Anda diundang untuk bergabung dengan {farm}."),
        },
    }
}

pub fn member_joined(locale: Locale, member: &str, farm: &str) -> NotificationText {
    match locale {
        Locale::En => NotificationText {
            title: "New member".to_string(),
            message: format!("{member} joined {farm}."),
        },
        Locale::Id => NotificationText {
            title: "Anggota baru".to_string(),
            message: format!("{member} bergabung dengan {farm}."),
        },
    }
}

pub fn activity_completed(
    locale: Locale,
    actor: &str,
    activity: &str,
    animal: &str,
) -> NotificationText {
    match locale {
        Locale::En => NotificationText {
            title: "Activity completed".to_string(),
            message: format!("{actor} completed \"{activity}\" for {animal}."),
        },
        Locale::Id => NotificationText {
            title: "Aktivitas selesai".to_string(),
            message: format!("{actor} menyelesaikan \"{activity}\" untuk {animal}."),
        },
    }
}

pub fn activity_created(
    locale: Locale,
    actor: &str,
    activity: &str,
    animal: &str,
) -> NotificationText {
    match locale {
        Locale::En => NotificationText {
            title: "New activity".to_string(),
            message: format!("{actor} added \"{activity}\" for {animal}."),
        },
        Locale::Id => NotificationText {
            title: "Aktivitas baru".to_string(),
            message: format!("{actor} menambahkan \"{activity}\" untuk {animal}."),
        },
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
