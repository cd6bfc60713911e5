// --- File: crates/expo_registro/src/form.rs ---
//! Registration form branches and their validation.
//!
//! Which fields a submission needs depends only on the entry point and, for
//! invitation links, on the flags of the invited record.

use expo_common::models::Contacto;
use expo_common::{ExpoError, FieldError};
use serde::{Deserialize, Serialize};

pub const MIN_PASSWORD_LEN: usize = 6;

const OBLIGATORIO: &str = "Este campo es obligatorio";

/// A base64 image attached to a form, optionally as a `data:` URL.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ImagenForm {
    pub data: String,
    #[serde(default)]
    pub content_type: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct AcompananteForm {
    #[serde(default)]
    pub nombre: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub telefono: String,
}

impl AcompananteForm {
    pub fn is_empty(&self) -> bool {
        self.nombre.trim().is_empty()
            && self.email.trim().is_empty()
            && self.telefono.trim().is_empty()
    }
}

/// Every field any registration branch may submit.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct RegistroForm {
    pub nombre: String,
    pub apellido: String,
    pub email: String,
    pub telefono: String,
    pub empresa: String,
    pub puesto: String,
    pub mensaje: String,
    pub categoria: String,
    pub descripcion: String,
    pub password: String,
    pub confirm_password: String,
    pub acompanante: Option<AcompananteForm>,
    pub logo: Option<ImagenForm>,
    pub galeria: Vec<ImagenForm>,
}

impl RegistroForm {
    fn campo(&self, nombre: &str) -> &str {
        match nombre {
            "nombre" => &self.nombre,
            "apellido" => &self.apellido,
            "email" => &self.email,
            "telefono" => &self.telefono,
            "empresa" => &self.empresa,
            "puesto" => &self.puesto,
            "categoria" => &self.categoria,
            "descripcion" => &self.descripcion,
            "password" => &self.password,
            "confirmPassword" => &self.confirm_password,
            _ => "",
        }
    }
}

/// The active branch of the registration form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub enum Rama {
    /// Self-service request, no account yet.
    Solicitud,
    /// Invited attendee, may bring a companion.
    Invitado,
    /// Companion invited by an attendee.
    Acompanante,
    /// Collaborator invited by an exhibitor.
    Colaborador,
    Expositor,
}

impl Rama {
    /// Branch for an invitation link, decided by the invited record.
    pub fn for_contacto(contacto: &Contacto) -> Rama {
        match (contacto.es_acompanante, contacto.es_invitado_expositor) {
            (true, _) => Rama::Acompanante,
            (false, true) => Rama::Colaborador,
            (false, false) => Rama::Invitado,
        }
    }

    pub fn required_fields(&self) -> &'static [&'static str] {
        match self {
            Rama::Solicitud => &["nombre", "apellido", "email", "telefono", "empresa", "puesto"],
            Rama::Acompanante => &["nombre", "telefono", "password", "confirmPassword"],
            Rama::Colaborador => &[
                "nombre",
                "apellido",
                "telefono",
                "puesto",
                "password",
                "confirmPassword",
            ],
            Rama::Invitado => &[
                "nombre",
                "apellido",
                "telefono",
                "empresa",
                "puesto",
                "password",
                "confirmPassword",
            ],
            Rama::Expositor => &[
                "nombre",
                "apellido",
                "email",
                "telefono",
                "empresa",
                "categoria",
                "descripcion",
                "password",
                "confirmPassword",
            ],
        }
    }

    fn creates_account(&self) -> bool {
        !matches!(self, Rama::Solicitud)
    }

    /// Every problem with the submission, or `Ok` when it can be accepted.
    pub fn validate(&self, form: &RegistroForm) -> Result<(), ExpoError> {
        let mut errores: Vec<FieldError> = self
            .required_fields()
            .iter()
            .filter(|campo| form.campo(campo).trim().is_empty())
            .map(|campo| FieldError::new(*campo, OBLIGATORIO))
            .collect();

        let required = self.required_fields();
        if required.contains(&"email") && !form.email.trim().is_empty() && !looks_like_email(&form.email) {
            errores.push(FieldError::new("email", "Correo electrónico inválido"));
        }

        if self.creates_account() && !form.password.is_empty() {
            if form.password.chars().count() < MIN_PASSWORD_LEN {
                errores.push(FieldError::new(
                    "password",
                    format!("La contraseña debe tener al menos {} caracteres", MIN_PASSWORD_LEN),
                ));
            }
            if !form.confirm_password.is_empty() && form.confirm_password != form.password {
                errores.push(FieldError::new("confirmPassword", "Las contraseñas no coinciden"));
            }
        }

        if *self == Rama::Invitado {
            if let Some(acompanante) = form.acompanante.as_ref().filter(|a| !a.is_empty()) {
                if acompanante.nombre.trim().is_empty() {
                    errores.push(FieldError::new("acompanante.nombre", OBLIGATORIO));
                }
                if !looks_like_email(&acompanante.email) {
                    errores.push(FieldError::new(
                        "acompanante.email",
                        "Correo electrónico inválido",
                    ));
                }
            }
        }

        if errores.is_empty() {
            Ok(())
        } else {
            Err(ExpoError::InvalidForm(errores))
        }
    }
}

pub fn looks_like_email(value: &str) -> bool {
    let value = value.trim();
    match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn campos(err: ExpoError) -> Vec<String> {
        match err {
            ExpoError::InvalidForm(fields) => fields.into_iter().map(|f| f.campo).collect(),
            other => panic!("expected InvalidForm, got {:?}", other),
        }
    }

    fn invitado() -> RegistroForm {
        RegistroForm {
            nombre: "Ana".to_string(),
            apellido: "López".to_string(),
            telefono: "6641234567".to_string(),
            empresa: "Acme".to_string(),
            puesto: "Gerente".to_string(),
            password: "secreto".to_string(),
            confirm_password: "secreto".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn branch_follows_record_flags() {
        let mut contacto = Contacto::default();
        assert_eq!(Rama::for_contacto(&contacto), Rama::Invitado);
        contacto.es_invitado_expositor = true;
        assert_eq!(Rama::for_contacto(&contacto), Rama::Colaborador);
        contacto.es_acompanante = true;
        assert_eq!(Rama::for_contacto(&contacto), Rama::Acompanante);
    }

    #[test]
    fn complete_guest_form_passes() {
        assert!(Rama::Invitado.validate(&invitado()).is_ok());
    }

    #[test]
    fn blank_required_fields_are_reported() {
        let form = RegistroForm {
            empresa: "   ".to_string(),
            ..invitado()
        };
        assert_eq!(campos(Rama::Invitado.validate(&form).unwrap_err()), vec!["empresa"]);
        // a companion does not need a company
        assert!(Rama::Acompanante.validate(&form).is_ok());
    }

    #[test]
    fn short_or_mismatched_passwords_are_refused() {
        let form = RegistroForm {
            password: "12345".to_string(),
            confirm_password: "54321".to_string(),
            ..invitado()
        };
        assert_eq!(
            campos(Rama::Invitado.validate(&form).unwrap_err()),
            vec!["password", "confirmPassword"]
        );

        let six = RegistroForm {
            password: "123456".to_string(),
            confirm_password: "123456".to_string(),
            ..invitado()
        };
        assert!(Rama::Colaborador.validate(&six).is_ok());
    }

    #[test]
    fn solicitud_needs_contact_data_but_no_password() {
        let form = RegistroForm {
            email: "ana@example.com".to_string(),
            password: String::new(),
            confirm_password: String::new(),
            ..invitado()
        };
        assert!(Rama::Solicitud.validate(&form).is_ok());

        let bad = RegistroForm {
            email: "ana-at-example".to_string(),
            ..form
        };
        assert_eq!(campos(Rama::Solicitud.validate(&bad).unwrap_err()), vec!["email"]);
    }

    #[test]
    fn exhibitor_needs_category_and_description() {
        let form = RegistroForm {
            email: "luis@acme.mx".to_string(),
            ..invitado()
        };
        assert_eq!(
            campos(Rama::Expositor.validate(&form).unwrap_err()),
            vec!["categoria", "descripcion"]
        );
    }

    #[test]
    fn partial_companion_is_reported() {
        let form = RegistroForm {
            acompanante: Some(AcompananteForm {
                nombre: "Beto".to_string(),
                ..Default::default()
            }),
            ..invitado()
        };
        assert_eq!(
            campos(Rama::Invitado.validate(&form).unwrap_err()),
            vec!["acompanante.email"]
        );

        let empty = RegistroForm {
            acompanante: Some(AcompananteForm::default()),
            ..invitado()
        };
        assert!(Rama::Invitado.validate(&empty).is_ok());
    }
}
