//! Explicit lifecycle for record forms.
//!
//! ```text
//! Editing --submit--> Submitted --persist--> Persisted
//!    ^                   |
//!    +----(invalid)------+
//! ```
//!
//! An invalid submission never reaches the store; it returns to `Editing`
//! with the validation errors attached.

use crate::services::StoreError;
use service_core::error::AppError;
use std::future::Future;
use validator::{Validate, ValidationErrors};

#[derive(Debug)]
pub enum FormState<T> {
    Editing {
        draft: T,
        errors: Option<ValidationErrors>,
    },
    Submitted {
        draft: T,
    },
    Persisted {
        id: String,
    },
}

#[derive(Debug)]
pub struct RecordForm<T> {
    state: FormState<T>,
}

impl<T: Validate> RecordForm<T> {
    pub fn edit(draft: T) -> Self {
        Self {
            state: FormState::Editing {
                draft,
                errors: None,
            },
        }
    }

    pub fn state(&self) -> &FormState<T> {
        &self.state
    }

    pub fn errors(&self) -> Option<&ValidationErrors> {
        match &self.state {
            FormState::Editing { errors, .. } => errors.as_ref(),
            _ => None,
        }
    }

    /// Identifier of the stored record once persisted.
    pub fn persisted_id(&self) -> Option<&str> {
        match &self.state {
            FormState::Persisted { id } => Some(id.as_str()),
            _ => None,
        }
    }

    /// Validates the draft. Submitting a form that is not being edited leaves
    /// it unchanged.
    pub fn submit(self) -> Self {
        let state = match self.state {
            FormState::Editing { draft, .. } => match draft.validate() {
                Ok(()) => FormState::Submitted { draft },
                Err(errors) => FormState::Editing {
                    draft,
                    errors: Some(errors),
                },
            },
            other => other,
        };
        Self { state }
    }

    /// Hands a valid submission to `save` and records the resulting id.
    ///
    /// Fails with the attached validation errors when the form is still being
    /// edited, and with the store error when saving fails.
    pub async fn persist<F, Fut>(self, save: F) -> Result<Self, AppError>
    where
        F: FnOnce(T) -> Fut,
        Fut: Future<Output = Result<String, StoreError>>,
    {
        match self.state {
            FormState::Submitted { draft } => {
                let id = save(draft).await?;
                Ok(Self {
                    state: FormState::Persisted { id },
                })
            }
            FormState::Editing {
                errors: Some(errors),
                ..
            } => Err(AppError::ValidationError(errors)),
            FormState::Editing { errors: None, .. } => Err(AppError::BadRequest(
                anyhow::anyhow!("Form has not been submitted"),
            )),
            FormState::Persisted { id } => Err(AppError::BadRequest(anyhow::anyhow!(
                "Form already persisted as {}",
                id
            ))),
        }
    }
}
