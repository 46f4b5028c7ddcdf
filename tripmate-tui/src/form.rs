//! Form state for the search, login and register pages.

use chrono::NaiveDate;
use tripmate_core::{NavigationContext, TripDate};

pub const INTEREST_OPTIONS: [(&str, &str); 12] = [
    ("history", "History"),
    ("food", "Food"),
    ("nightlife", "Nightlife"),
    ("nature", "Nature"),
    ("museums", "Museums"),
    ("shopping", "Shopping"),
    ("adventure", "Adventure"),
    ("art", "Art"),
    ("architecture", "Architecture"),
    ("beaches", "Beaches"),
    ("culture", "Culture"),
    ("wellness", "Wellness"),
];

/// Single-line text input. The cursor is always at the end.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextField {
    pub value: String,
    pub masked: bool,
}

impl TextField {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            masked: false,
        }
    }

    pub fn masked() -> Self {
        Self {
            value: String::new(),
            masked: true,
        }
    }

    pub fn push(&mut self, c: char) {
        if !c.is_control() {
            self.value.push(c);
        }
    }

    pub fn backspace(&mut self) {
        self.value.pop();
    }

    pub fn display(&self) -> String {
        if self.masked {
            "•".repeat(self.value.chars().count())
        } else {
            self.value.clone()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchField {
    #[default]
    Destination,
    StartDate,
    EndDate,
    Interests,
}

impl SearchField {
    const ORDER: [SearchField; 4] = [
        SearchField::Destination,
        SearchField::StartDate,
        SearchField::EndDate,
        SearchField::Interests,
    ];

    pub fn next(self) -> Self {
        let i = Self::ORDER.iter().position(|f| *f == self).unwrap_or(0);
        Self::ORDER[(i + 1) % Self::ORDER.len()]
    }

    pub fn previous(self) -> Self {
        let i = Self::ORDER.iter().position(|f| *f == self).unwrap_or(0);
        Self::ORDER[(i + Self::ORDER.len() - 1) % Self::ORDER.len()]
    }

    pub fn is_text(self) -> bool {
        self != SearchField::Interests
    }
}

#[derive(Debug, Clone, Default)]
pub struct SearchForm {
    pub destination: TextField,
    pub start_date: TextField,
    pub end_date: TextField,
    /// Selected interest ids in the order they were picked.
    pub interests: Vec<String>,
    pub interest_cursor: usize,
    pub focus: SearchField,
    pub error: Option<String>,
}

fn parse_date(field: &TextField, label: &str) -> Result<Option<TripDate>, String> {
    let raw = field.value.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map(Some)
        .map_err(|_| format!("{} must be YYYY-MM-DD", label))
}

impl SearchForm {
    pub fn focused_field(&mut self) -> Option<&mut TextField> {
        match self.focus {
            SearchField::Destination => Some(&mut self.destination),
            SearchField::StartDate => Some(&mut self.start_date),
            SearchField::EndDate => Some(&mut self.end_date),
            SearchField::Interests => None,
        }
    }

    pub fn toggle_interest(&mut self) {
        let Some((id, _)) = INTEREST_OPTIONS.get(self.interest_cursor) else {
            return;
        };
        match self.interests.iter().position(|i| i == id) {
            Some(pos) => {
                self.interests.remove(pos);
            }
            None => self.interests.push((*id).to_string()),
        }
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.interests.iter().any(|i| i == id)
    }

    pub fn move_interest(&mut self, delta: isize) {
        let len = INTEREST_OPTIONS.len() as isize;
        self.interest_cursor = (self.interest_cursor as isize + delta).rem_euclid(len) as usize;
    }

    /// Turn the form into the context handed to the trip page.
    pub fn to_context(&self, today: TripDate) -> Result<NavigationContext, String> {
        let destination = self.destination.value.trim();
        if destination.is_empty() {
            return Err("Please enter a destination.".to_string());
        }
        let start = parse_date(&self.start_date, "Start date")?;
        let end = parse_date(&self.end_date, "End date")?;
        if let Some(start) = start {
            if start < today {
                return Err("Start date cannot be in the past".to_string());
            }
        }
        if let (Some(start), Some(end)) = (start, end) {
            if end < start {
                return Err("End date must be on or after the start date".to_string());
            }
        }
        Ok(NavigationContext::new(destination)
            .with_dates(start, end)
            .with_interests(self.interests.clone()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AccountField {
    #[default]
    Username,
    Email,
    Password,
}

/// Shared by the login and register pages; login skips the email field.
#[derive(Debug, Clone)]
pub struct AccountForm {
    pub username: TextField,
    pub email: TextField,
    pub password: TextField,
    pub focus: AccountField,
    pub with_email: bool,
    pub submitting: bool,
    pub error: Option<String>,
}

impl AccountForm {
    pub fn login() -> Self {
        Self {
            username: TextField::default(),
            email: TextField::default(),
            password: TextField::masked(),
            focus: AccountField::Username,
            with_email: false,
            submitting: false,
            error: None,
        }
    }

    pub fn register() -> Self {
        Self {
            with_email: true,
            ..Self::login()
        }
    }

    fn fields(&self) -> &'static [AccountField] {
        if self.with_email {
            &[AccountField::Username, AccountField::Email, AccountField::Password]
        } else {
            &[AccountField::Username, AccountField::Password]
        }
    }

    pub fn next(&mut self) {
        let fields = self.fields();
        let i = fields.iter().position(|f| *f == self.focus).unwrap_or(0);
        self.focus = fields[(i + 1) % fields.len()];
    }

    pub fn previous(&mut self) {
        let fields = self.fields();
        let i = fields.iter().position(|f| *f == self.focus).unwrap_or(0);
        self.focus = fields[(i + fields.len() - 1) % fields.len()];
    }

    pub fn focused_field(&mut self) -> &mut TextField {
        match self.focus {
            AccountField::Username => &mut self.username,
            AccountField::Email => &mut self.email,
            AccountField::Password => &mut self.password,
        }
    }

    pub fn check(&self) -> Result<(), String> {
        if self.username.value.trim().is_empty() || self.password.value.is_empty() {
            return Err("Username and password are required.".to_string());
        }
        Ok(())
    }
}
