//! Short user-facing notices for the outcome of a sync operation.
//!
//! Every error a service returns maps to exactly one notice, so callers
//! never have to inspect the error themselves to tell the user something.

use seniorcare_core::{
    errors::CareError,
    models::friends::{Profile, RequestStatus},
};
use tracing::{debug, error};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub title: String,
    pub description: String,
    /// Rendered as an error rather than a confirmation.
    pub destructive: bool,
}

impl Notice {
    pub fn success(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            destructive: false,
        }
    }

    pub fn failure(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            destructive: true,
        }
    }

    pub fn request_sent(to: &Profile) -> Self {
        Self::success(
            "Sucesso!",
            format!("Solicitação enviada para {}", to.display_name()),
        )
    }

    pub fn request_answered(status: RequestStatus) -> Self {
        match status {
            RequestStatus::Accepted => Self::success("Solicitação aceita!", "Agora vocês são amigos!"),
            _ => Self::success("Solicitação recusada", "A solicitação foi recusada."),
        }
    }

    pub fn from_error(err: &CareError) -> Self {
        match err {
            CareError::NotFound(_) => Self::failure(
                "Usuário não encontrado",
                "Não foi possível encontrar um usuário com esse nome.",
            ),
            CareError::Conflict(_) => Self::failure(
                "Solicitação já enviada",
                "Você já enviou uma solicitação para este usuário.",
            ),
            CareError::Validation(message) => Self::failure("Erro", message.clone()),
            CareError::Authentication(_) => Self::failure("Erro", "Não autenticado"),
            CareError::Backend(_) | CareError::Storage(_) | CareError::Internal(_) => {
                Self::failure("Erro", "Não foi possível concluir a operação.")
            }
        }
    }
}

/// Logs a failed operation and hands the error back.
///
/// User errors are expected outcomes and only logged at debug level.
pub fn report(context: &str, err: CareError) -> CareError {
    if err.is_user_error() {
        debug!("{}: {}", context, err);
    } else {
        error!("{}: {}", context, err);
    }
    err
}
