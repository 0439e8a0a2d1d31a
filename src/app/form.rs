use chrono::{NaiveDate, NaiveTime};

use crate::api::wire;

/// Short weekday names, indexed Sunday-is-0 like the backend.
pub const WEEKDAY_NAMES: [&str; 7] = ["Dom", "Lun", "Mar", "Mié", "Jue", "Vie", "Sáb"];

#[derive(Debug, Clone, PartialEq)]
pub struct Choice {
    pub value: String,
    pub label: String,
}

impl Choice {
    pub fn new(value: impl ToString, label: impl Into<String>) -> Self {
        Self {
            value: value.to_string(),
            label: label.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    Text,
    Secret,
    Date,
    Time,
    Number,
    Decimal,
    Toggle,
    Choice(Vec<Choice>),
    /// Comma separated Sunday-is-0 day numbers, toggled with the digit keys.
    Weekdays,
}

#[derive(Debug, Clone)]
pub struct Field {
    pub key: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub value: String,
    pub required: bool,
    pub hidden: bool,
}

impl Field {
    fn new(key: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self {
            key,
            label,
            kind,
            value: String::new(),
            required: false,
            hidden: false,
        }
    }

    pub fn text(key: &'static str, label: &'static str) -> Self {
        Self::new(key, label, FieldKind::Text)
    }

    pub fn secret(key: &'static str, label: &'static str) -> Self {
        Self::new(key, label, FieldKind::Secret)
    }

    pub fn date(key: &'static str, label: &'static str) -> Self {
        Self::new(key, label, FieldKind::Date)
    }

    pub fn time(key: &'static str, label: &'static str) -> Self {
        Self::new(key, label, FieldKind::Time)
    }

    pub fn number(key: &'static str, label: &'static str) -> Self {
        Self::new(key, label, FieldKind::Number)
    }

    pub fn decimal(key: &'static str, label: &'static str) -> Self {
        Self::new(key, label, FieldKind::Decimal)
    }

    pub fn toggle(key: &'static str, label: &'static str, on: bool) -> Self {
        Self::new(key, label, FieldKind::Toggle).value(on.to_string())
    }

    pub fn choice(key: &'static str, label: &'static str, choices: Vec<Choice>) -> Self {
        Self::new(key, label, FieldKind::Choice(choices))
    }

    pub fn weekdays(key: &'static str, label: &'static str, days: &[u8]) -> Self {
        Self::new(key, label, FieldKind::Weekdays).value(join_weekdays(days))
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    pub fn hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }

    /// What the form shows for this field.
    pub fn display(&self) -> String {
        match &self.kind {
            FieldKind::Secret => "*".repeat(self.value.chars().count()),
            FieldKind::Toggle => {
                if self.value == "true" {
                    "[x]".to_string()
                } else {
                    "[ ]".to_string()
                }
            }
            FieldKind::Choice(choices) => choices
                .iter()
                .find(|c| c.value == self.value)
                .map(|c| c.label.clone())
                .unwrap_or_else(|| "(seleccione)".to_string()),
            FieldKind::Weekdays => {
                let days = parse_weekdays(&self.value);
                WEEKDAY_NAMES
                    .iter()
                    .enumerate()
                    .map(|(i, name)| {
                        if days.contains(&(i as u8)) {
                            format!("[{name}]")
                        } else {
                            format!(" {name} ")
                        }
                    })
                    .collect::<Vec<_>>()
                    .join("")
            }
            _ => self.value.clone(),
        }
    }

    fn is_blank(&self) -> bool {
        match self.kind {
            FieldKind::Weekdays => parse_weekdays(&self.value).is_empty(),
            FieldKind::Toggle => false,
            _ => self.value.trim().is_empty(),
        }
    }
}

/// Create/edit modal state, shared by every management page.
#[derive(Debug, Clone)]
pub struct FormState {
    pub title: String,
    pub fields: Vec<Field>,
    pub active: usize,
    pub editing: Option<i64>,
    pub error: Option<String>,
    pub submitting: bool,
}

impl FormState {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            fields: Vec::new(),
            active: 0,
            editing: None,
            error: None,
            submitting: false,
        }
    }

    pub fn field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    pub fn editing(mut self, id: Option<i64>) -> Self {
        self.editing = id;
        self
    }

    pub fn is_edit(&self) -> bool {
        self.editing.is_some()
    }

    fn find(&self, key: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.key == key)
    }

    fn find_mut(&mut self, key: &str) -> Option<&mut Field> {
        self.fields.iter_mut().find(|f| f.key == key)
    }

    pub fn get(&self, key: &str) -> &str {
        self.find(key).map(|f| f.value.as_str()).unwrap_or_default()
    }

    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        if let Some(field) = self.find_mut(key) {
            field.value = value.into();
        }
    }

    pub fn set_hidden(&mut self, key: &str, hidden: bool) {
        if let Some(field) = self.find_mut(key) {
            field.hidden = hidden;
        }
    }

    pub fn set_choices(&mut self, key: &str, choices: Vec<Choice>) {
        if let Some(field) = self.find_mut(key) {
            field.kind = FieldKind::Choice(choices);
        }
    }

    pub fn is_on(&self, key: &str) -> bool {
        self.get(key) == "true"
    }

    pub fn active_field(&self) -> Option<&Field> {
        self.fields.get(self.active)
    }

    pub fn visible(&self) -> impl Iterator<Item = (usize, &Field)> {
        self.fields.iter().enumerate().filter(|(_, f)| !f.hidden)
    }

    pub fn next(&mut self) {
        self.step(1);
    }

    pub fn prev(&mut self) {
        self.step(self.fields.len().saturating_sub(1));
    }

    fn step(&mut self, by: usize) {
        let len = self.fields.len();
        if len == 0 {
            return;
        }
        for _ in 0..len {
            self.active = (self.active + by) % len;
            if !self.fields[self.active].hidden {
                return;
            }
        }
    }

    /// Types `c` into the active field. Returns the key of the field that changed.
    pub fn input_char(&mut self, c: char) -> Option<&'static str> {
        let field = self.fields.get_mut(self.active)?;
        let accepted = match field.kind {
            FieldKind::Text | FieldKind::Secret => true,
            FieldKind::Date => c.is_ascii_digit() || c == '-',
            FieldKind::Time => c.is_ascii_digit() || c == ':',
            FieldKind::Number => c.is_ascii_digit(),
            FieldKind::Decimal => c.is_ascii_digit() || c == '.' || c == '-',
            FieldKind::Weekdays => {
                if let Some(day) = c.to_digit(10).filter(|d| *d <= 6) {
                    let mut days = parse_weekdays(&field.value);
                    match days.iter().position(|d| *d as u32 == day) {
                        Some(pos) => {
                            days.remove(pos);
                        }
                        None => days.push(day as u8),
                    }
                    field.value = join_weekdays(&days);
                    return Some(field.key);
                }
                false
            }
            FieldKind::Toggle | FieldKind::Choice(_) => {
                if c == ' ' {
                    return self.activate();
                }
                false
            }
        };
        if !accepted {
            return None;
        }
        field.value.push(c);
        Some(field.key)
    }

    pub fn backspace(&mut self) -> Option<&'static str> {
        let field = self.fields.get_mut(self.active)?;
        match field.kind {
            FieldKind::Toggle | FieldKind::Choice(_) | FieldKind::Weekdays => None,
            _ => field.value.pop().map(|_| field.key),
        }
    }

    /// Flips a toggle or advances a choice.
    pub fn activate(&mut self) -> Option<&'static str> {
        self.cycle(true)
    }

    pub fn cycle(&mut self, forward: bool) -> Option<&'static str> {
        let field = self.fields.get_mut(self.active)?;
        match &field.kind {
            FieldKind::Toggle => {
                field.value = (field.value != "true").to_string();
                Some(field.key)
            }
            FieldKind::Choice(choices) if !choices.is_empty() => {
                let len = choices.len();
                let next = match choices.iter().position(|c| c.value == field.value) {
                    Some(i) if forward => (i + 1) % len,
                    Some(i) => (i + len - 1) % len,
                    None if forward => 0,
                    None => len - 1,
                };
                field.value = choices[next].value.clone();
                Some(field.key)
            }
            _ => None,
        }
    }

    /// Label of the first visible required field left empty.
    pub fn missing_required(&self) -> Option<&'static str> {
        self.visible()
            .find(|(_, f)| f.required && f.is_blank())
            .map(|(_, f)| f.label)
    }

    fn label_of(&self, key: &str) -> &'static str {
        self.find(key).map(|f| f.label).unwrap_or("campo")
    }

    pub fn text(&self, key: &str) -> Option<String> {
        let value = self.get(key).trim();
        (!value.is_empty()).then(|| value.to_string())
    }

    pub fn date(&self, key: &str) -> Result<Option<NaiveDate>, String> {
        let raw = self.get(key).trim();
        if raw.is_empty() {
            return Ok(None);
        }
        wire::parse_date(raw)
            .map(Some)
            .ok_or_else(|| format!("{}: fecha inválida (AAAA-MM-DD)", self.label_of(key)))
    }

    pub fn time(&self, key: &str) -> Result<Option<NaiveTime>, String> {
        let raw = self.get(key).trim();
        if raw.is_empty() {
            return Ok(None);
        }
        wire::parse_time(raw)
            .map(Some)
            .ok_or_else(|| format!("{}: hora inválida (HH:MM)", self.label_of(key)))
    }

    pub fn number(&self, key: &str) -> Result<Option<i64>, String> {
        let raw = self.get(key).trim();
        if raw.is_empty() {
            return Ok(None);
        }
        raw.parse()
            .map(Some)
            .map_err(|_| format!("{}: número inválido", self.label_of(key)))
    }

    pub fn decimal(&self, key: &str) -> Result<Option<f64>, String> {
        let raw = self.get(key).trim();
        if raw.is_empty() {
            return Ok(None);
        }
        raw.parse()
            .map(Some)
            .map_err(|_| format!("{}: número inválido", self.label_of(key)))
    }

    /// A required date; reports the field label when absent.
    pub fn required_date(&self, key: &str) -> Result<NaiveDate, String> {
        self.date(key)?
            .ok_or_else(|| format!("{} es obligatorio", self.label_of(key)))
    }

    pub fn required_time(&self, key: &str) -> Result<NaiveTime, String> {
        self.time(key)?
            .ok_or_else(|| format!("{} es obligatorio", self.label_of(key)))
    }

    pub fn required_id(&self, key: &str) -> Result<i64, String> {
        self.number(key)?
            .ok_or_else(|| format!("{} es obligatorio", self.label_of(key)))
    }

    pub fn weekdays(&self, key: &str) -> Vec<u8> {
        parse_weekdays(self.get(key))
    }
}

pub fn parse_weekdays(raw: &str) -> Vec<u8> {
    let mut days: Vec<u8> = raw
        .split(',')
        .filter_map(|d| d.trim().parse().ok())
        .filter(|d| *d <= 6)
        .collect();
    days.sort_unstable();
    days.dedup();
    days
}

fn join_weekdays(days: &[u8]) -> String {
    let mut days = days.to_vec();
    days.sort_unstable();
    days.dedup();
    days.iter()
        .map(|d| d.to_string())
        .collect::<Vec<_>>()
        .join(",")
}
