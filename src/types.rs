use serde::Serialize;

/// One employee row as extracted from the source text.
///
/// Fields are stored trimmed and the postal code is guaranteed to be all
/// ASCII digits; `new` is the only way to build one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldRecord {
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Email")]
    email: String,
    #[serde(rename = "Phone")]
    phone: String,
    #[serde(rename = "Address")]
    address: String,
    #[serde(rename = "PostalCode")]
    postal_code: String,
}

/// Records in order of appearance in the source text.
pub type RecordSequence = Vec<FieldRecord>;

impl FieldRecord {
    /// Builds a record from raw captured text, trimming every field.
    ///
    /// Returns `None` when the postal code is not a non-empty run of digits.
    pub fn new(name: &str, email: &str, phone: &str, address: &str, postal_code: &str) -> Option<Self> {
        let postal_code = postal_code.trim();
        if !is_postal_code(postal_code) {
            return None;
        }
        Some(Self {
            name: name.trim().to_string(),
            email: email.trim().to_string(),
            phone: phone.trim().to_string(),
            address: address.trim().to_string(),
            postal_code: postal_code.to_string(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn phone(&self) -> &str {
        &self.phone
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn postal_code(&self) -> &str {
        &self.postal_code
    }

    /// Fields in table column order.
    pub fn fields(&self) -> [&str; 5] {
        [
            &self.name,
            &self.email,
            &self.phone,
            &self.address,
            &self.postal_code,
        ]
    }
}

/// Accepts one or more ASCII decimal digits and nothing else.
pub fn is_postal_code(candidate: &str) -> bool {
    !candidate.is_empty() && candidate.bytes().all(|b| b.is_ascii_digit())
}
