//! Property tests for construct-from-partial and the save/get round trip.

use std::sync::Arc;

use proptest::prelude::*;
use record_base::{InMemoryStore, ManualClock, Record, RecordExt, RecordMapper};
use serde_json::json;

use super::attrs;
use super::models::User;

proptest! {
    #[test]
    fn from_partial_never_aliases_source(
        name in "[a-zA-Z ]{0,16}",
        tags in prop::collection::vec("[a-z]{1,8}", 0..5),
        extra in "[a-z]{1,8}",
    ) {
        let mut partial = attrs(json!({
            "id": "u-1",
            "displayName": name.clone(),
            "profile": {"bio": "", "tags": tags.clone()},
        }));
        let mut user = User::from_partial(&partial).unwrap();

        partial.insert("displayName".into(), json!(format!("{}!", name)));
        if let Some(profile) = partial.get_mut("profile") {
            profile["tags"] = json!([extra.clone()]);
        }
        prop_assert_eq!(&user.display_name, &name);
        prop_assert_eq!(&user.profile.tags, &tags);

        user.profile.tags.push(extra.clone());
        prop_assert_eq!(&partial["profile"]["tags"], &json!([extra]));
    }

    #[test]
    fn save_then_get_returns_partial_plus_timestamps(
        id in "[a-z0-9]{1,12}",
        email in "[a-z]{1,8}@example\\.com",
        login_count in any::<u32>(),
        tags in prop::collection::vec("[a-z]{1,8}", 0..4),
        now in 1i64..4_000_000_000_000,
    ) {
        let clock = Arc::new(ManualClock::new(now));
        let mapper = RecordMapper::new(InMemoryStore::new()).with_clock(clock.clone());

        let partial = attrs(json!({
            "id": id.clone(),
            "email": email.clone(),
            "loginCount": login_count,
            "profile": {"bio": "b", "tags": tags.clone()},
        }));
        let mut user = User::from_partial(&partial).unwrap();
        user.save(&mapper).unwrap();

        let loaded = mapper.records::<User>().get_by_id_strong(&id).unwrap();
        prop_assert_eq!(loaded.id(), id.as_str());
        prop_assert_eq!(&loaded.email, &email);
        prop_assert_eq!(loaded.login_count, login_count);
        prop_assert_eq!(&loaded.profile.tags, &tags);
        prop_assert_eq!(loaded.meta.created_at, now);
        prop_assert_eq!(loaded.meta.updated_at, now);
        prop_assert_eq!(loaded, user);
    }
}
