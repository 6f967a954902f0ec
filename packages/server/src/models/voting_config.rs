use common::{NewVotingConfig, VotingConfig};

use crate::error::AppError;

pub fn validate_new_voting_config(req: &NewVotingConfig) -> Result<(), AppError> {
    if req.end_time < req.start_time {
        return Err(AppError::Validation(
            "end_time must not be before start_time".into(),
        ));
    }
    Ok(())
}

impl From<crate::entity::voting_config::Model> for VotingConfig {
    fn from(m: crate::entity::voting_config::Model) -> Self {
        Self {
            id: m.id,
            start_time: m.start_time,
            end_time: m.end_time,
            is_active: m.is_active,
            created_at: m.created_at,
        }
    }
}
