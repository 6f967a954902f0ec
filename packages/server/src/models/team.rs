use common::{NewTeam, Team};

use super::shared::validate_name;
use crate::error::AppError;

pub fn validate_new_team(req: &NewTeam) -> Result<(), AppError> {
    validate_name("Team name", &req.team_name)?;
    if let Some(ref description) = req.description
        && description.len() > 10_000
    {
        return Err(AppError::Validation(
            "Description must be at most 10000 bytes".into(),
        ));
    }
    Ok(())
}

impl From<crate::entity::team::Model> for Team {
    fn from(m: crate::entity::team::Model) -> Self {
        Self {
            id: m.id,
            team_name: m.team_name,
            description: m.description,
            votes: m.votes,
            created_at: m.created_at,
        }
    }
}
