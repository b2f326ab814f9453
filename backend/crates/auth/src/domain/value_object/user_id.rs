use kernel::id::Id;

/// Marker for user identifiers
pub struct UserMarker;
pub type UserId = Id<UserMarker>;

#[cfg(test)]
mod tests {
    use super::*;
    use kernel::id::PostId;

    #[test]
    fn test_user_id_is_v4() {
        let user_id = UserId::new();
        assert_eq!(user_id.as_uuid().get_version_num(), 4);
    }

    #[test]
    fn test_user_id_parses_from_path_segment() {
        let uuid = uuid::Uuid::new_v4();
        let user_id: UserId = uuid.to_string().parse().unwrap();
        assert_eq!(user_id.as_uuid(), &uuid);
        // Same uuid, different entity: only the raw value is comparable
        let post_id = PostId::from_uuid(uuid);
        assert_eq!(post_id.as_uuid(), user_id.as_uuid());
    }
}
