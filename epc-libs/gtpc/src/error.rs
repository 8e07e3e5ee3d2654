use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("Unknown GTP-C procedure name '{0}'")]
    UnknownProcedure(String),

    #[error("Unknown F-TEID interface type {0}")]
    UnknownInterfaceType(u8),

    #[error("EBI {0} out of range (must be 0-15)")]
    EbiOutOfRange(u8),
}
