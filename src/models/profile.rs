use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::LazyLock;

/// Profile shown on first visit, before any switching.
pub const DEFAULT_PROFILE: &str = "Ava Chen";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseRecord {
    pub item: String,
    pub price: u32,
}

/// A scripted shopper profile: demographics, browsing and purchase history,
/// and stated preferences. Immutable reference data, looked up by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub name: String,
    pub age: u32,
    pub gender: String,
    pub aesthetic: String,
    pub size: String,
    pub budget: u32,
    pub event_type: Vec<String>,
    pub browsing_data: Vec<String>,
    pub purchase_history: Vec<PurchaseRecord>,
    pub preferences: Vec<String>,
}

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn purchases(items: &[(&str, u32)]) -> Vec<PurchaseRecord> {
    items
        .iter()
        .map(|(item, price)| PurchaseRecord {
            item: item.to_string(),
            price: *price,
        })
        .collect()
}

/// The two demo profiles, keyed by name.
pub static ALL_PROFILES: LazyLock<BTreeMap<&'static str, UserProfile>> = LazyLock::new(|| {
    let ava = UserProfile {
        name: "Ava Chen".to_string(),
        age: 27,
        gender: "female".to_string(),
        aesthetic: "minimalist".to_string(),
        size: "small".to_string(),
        budget: 150,
        event_type: owned(&["corporate_events", "brunches"]),
        browsing_data: owned(&["blazers", "neutral basics", "capsule wardrobe"]),
        purchase_history: purchases(&[
            ("wool coat", 210),
            ("silk blouse", 95),
            ("tailored trousers", 180),
        ]),
        preferences: owned(&["sustainable_fabrics", "neutral_tones"]),
    };

    let leo = UserProfile {
        name: "Leo Nguyen".to_string(),
        age: 29,
        gender: "male".to_string(),
        aesthetic: "smart casual".to_string(),
        size: "medium".to_string(),
        budget: 120,
        event_type: owned(&["work_dinners", "travel"]),
        browsing_data: owned(&["polos", "chinos", "travel_blazers"]),
        purchase_history: purchases(&[
            ("linen shirt", 65),
            ("navy chinos", 80),
            ("leather belt", 40),
        ]),
        preferences: owned(&["slim_fits", "navy_white_palette"]),
    };

    BTreeMap::from([("Ava Chen", ava), ("Leo Nguyen", leo)])
});

/// Look up a profile by exact name.
pub fn by_name(name: &str) -> Option<&'static UserProfile> {
    ALL_PROFILES.get(name)
}

pub fn default_profile() -> &'static UserProfile {
    &ALL_PROFILES[DEFAULT_PROFILE]
}

/// The profile the "switch profile" button lands on: the other of the two.
pub fn switch_target(name: &str) -> &'static UserProfile {
    ALL_PROFILES
        .values()
        .find(|profile| profile.name != name)
        .unwrap_or_else(default_profile)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn both_demo_profiles_present() {
        assert_eq!(ALL_PROFILES.len(), 2);
        assert!(by_name("Ava Chen").is_some());
        assert!(by_name("Leo Nguyen").is_some());
        assert!(by_name("Nobody").is_none());
    }

    #[test]
    fn switch_target_alternates() {
        assert_eq!(switch_target("Ava Chen").name, "Leo Nguyen");
        assert_eq!(switch_target("Leo Nguyen").name, "Ava Chen");
    }

    #[test]
    fn switching_twice_returns_to_original() {
        let once = switch_target("Ava Chen");
        let twice = switch_target(&once.name);
        assert_eq!(twice.name, "Ava Chen");
    }

    #[test]
    fn profile_serializes_to_structured_json() {
        let json = serde_json::to_value(default_profile()).unwrap();
        assert_eq!(json["name"], "Ava Chen");
        assert_eq!(json["purchase_history"][0]["item"], "wool coat");
        assert_eq!(json["purchase_history"][0]["price"], 210);
    }
}
