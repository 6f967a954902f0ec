use common::UserProfile;

impl From<crate::entity::profile::Model> for UserProfile {
    fn from(m: crate::entity::profile::Model) -> Self {
        Self {
            id: m.id,
            user_id: m.user_id,
            username: m.username,
            email: m.email,
            has_voted: m.has_voted,
            is_admin: m.is_admin,
        }
    }
}
