use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Tenant,
    Landlord,
    Agent,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Tenant => "tenant",
            Role::Landlord => "landlord",
            Role::Agent => "agent",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
pub struct User {
    pub id: String,
    pub email: String,
    #[serde(rename = "firstName")]
    pub first_name: String,
    #[serde(rename = "lastName")]
    pub last_name: String,
    pub role: Role,
}

impl User {
    pub fn full_name(&self) -> String {
        match (self.first_name.is_empty(), self.last_name.is_empty()) {
            (false, false) => format!("{} {}", self.first_name, self.last_name),
            (false, true) => self.first_name.clone(),
            (true, false) => self.last_name.clone(),
            (true, true) => self.email.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_parses_backend_shape() {
        let json = r#"{"id":"1","email":"a@b.com","firstName":"A","lastName":"B","role":"tenant"}"#;
        let user: User = serde_json::from_str(json).expect("Failed to parse user JSON");
        assert_eq!(user.id, "1");
        assert_eq!(user.first_name, "A");
        assert_eq!(user.last_name, "B");
        assert_eq!(user.role, Role::Tenant);
    }

    #[test]
    fn test_user_serializes_camel_case() {
        let user = User {
            id: "7".to_string(),
            email: "l@example.com".to_string(),
            first_name: "Lola".to_string(),
            last_name: "Okafor".to_string(),
            role: Role::Landlord,
        };
        let value = serde_json::to_value(&user).expect("Failed to serialize user");
        assert_eq!(value["firstName"], "Lola");
        assert_eq!(value["lastName"], "Okafor");
        assert_eq!(value["role"], "landlord");
    }

    #[test]
    fn test_unknown_role_rejected() {
        let json = r#"{"id":"1","email":"a@b.com","firstName":"A","lastName":"B","role":"admin"}"#;
        assert!(serde_json::from_str::<User>(json).is_err());
    }

    #[test]
    fn test_full_name_fallbacks() {
        let mut user = User {
            id: "1".to_string(),
            email: "a@b.com".to_string(),
            first_name: "Ada".to_string(),
            last_name: String::new(),
            role: Role::Agent,
        };
        assert_eq!(user.full_name(), "Ada");
        user.first_name.clear();
        assert_eq!(user.full_name(), "a@b.com");
    }
}
