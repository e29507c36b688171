use thiserror::Error;

use crate::events::TargetId;

#[derive(Debug, Error)]
pub enum HuntError {
    #[error("latitude {0} outside [-90, 90]")]
    LatitudeOutOfRange(f64),
    #[error("longitude {0} outside [-180, 180]")]
    LongitudeOutOfRange(f64),
    #[error("coordinate component is not finite")]
    NonFiniteCoordinate,
    #[error("unknown target id {0}")]
    UnknownTarget(TargetId),
}
