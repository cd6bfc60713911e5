//! HTML bodies for every email the service sends.

use chrono::NaiveDate;
use expo_common::models::{Cita, Solicitud};
use expo_common::services::EmailMessage;
use expo_config::EventoConfig;

/// Minimal HTML escaping for user-supplied text.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn layout(evento: &EventoConfig, title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="es">
<body style="font-family: Arial, sans-serif; color: #1f2937;">
  <h2 style="color: #0f4c81;">{title}</h2>
  {body}
  <hr>
  <p style="font-size: 12px; color: #6b7280;">{evento} &middot; {sede}</p>
</body>
</html>"#,
        title = escape(title),
        body = body,
        evento = escape(&evento.nombre),
        sede = escape(&evento.sede),
    )
}

fn message(to: &str, subject: String, html: String) -> EmailMessage {
    EmailMessage {
        to: to.to_string(),
        subject,
        html,
    }
}

fn fecha_larga(fecha: NaiveDate) -> String {
    fecha.format("%d/%m/%Y").to_string()
}

/// Acknowledgement of a self-service registration request.
pub fn solicitud_recibida(evento: &EventoConfig, solicitud: &Solicitud) -> EmailMessage {
    let body = format!(
        "<p>Hola {},</p><p>Recibimos tu solicitud de registro para {}. \
         Te enviaremos tu invitación en cuanto sea aprobada.</p>",
        escape(&solicitud.nombre),
        escape(&evento.nombre)
    );
    message(
        &solicitud.email,
        format!("Recibimos tu solicitud - {}", evento.nombre),
        layout(evento, "Solicitud recibida", &body),
    )
}

pub fn solicitud_rechazada(evento: &EventoConfig, solicitud: &Solicitud) -> EmailMessage {
    let body = format!(
        "<p>Hola {},</p><p>Lamentamos informarte que tu solicitud de registro para {} \
         no fue aprobada en esta ocasión.</p>",
        escape(&solicitud.nombre),
        escape(&evento.nombre)
    );
    message(
        &solicitud.email,
        format!("Tu solicitud - {}", evento.nombre),
        layout(evento, "Solicitud no aprobada", &body),
    )
}

/// Invitation link to complete a registration (guests, companions and
/// exhibitor collaborators).
pub fn invitacion(evento: &EventoConfig, to: &str, nombre: &str, link: &str) -> EmailMessage {
    let body = format!(
        "<p>Hola {},</p><p>Estás invitado a {}. Completa tu registro aquí:</p>\
         <p><a href=\"{link}\">{link}</a></p>",
        escape(nombre),
        escape(&evento.nombre),
        link = escape(link)
    );
    message(
        to,
        format!("Invitación - {}", evento.nombre),
        layout(evento, "Tu invitación", &body),
    )
}

pub fn registro_confirmado(
    evento: &EventoConfig,
    to: &str,
    nombre: &str,
    codigo: &str,
) -> EmailMessage {
    let body = format!(
        "<p>Hola {},</p><p>Tu registro para {} está confirmado.</p>\
         <p>Tu código de confirmación es <strong>{}</strong>. Preséntalo en el acceso.</p>",
        escape(nombre),
        escape(&evento.nombre),
        escape(codigo)
    );
    message(
        to,
        format!("Registro confirmado - {}", evento.nombre),
        layout(evento, "Registro confirmado", &body),
    )
}

pub fn bienvenida_expositor(
    evento: &EventoConfig,
    to: &str,
    nombre: &str,
    empresa: &str,
    codigo: &str,
) -> EmailMessage {
    let body = format!(
        "<p>Hola {},</p><p>{} quedó registrada como expositor en {}.</p>\
         <p>Código de confirmación: <strong>{}</strong></p>\
         <p>Desde tu portal puedes completar tu perfil y recibir solicitudes de citas.</p>",
        escape(nombre),
        escape(empresa),
        escape(&evento.nombre),
        escape(codigo)
    );
    message(
        to,
        format!("Bienvenido como expositor - {}", evento.nombre),
        layout(evento, "Bienvenido", &body),
    )
}

fn cita_detalle(cita: &Cita) -> String {
    let mut detalle = format!(
        "<ul><li>Fecha: {}</li><li>Hora: {}</li>",
        fecha_larga(cita.fecha),
        escape(&cita.hora)
    );
    if !cita.tema.is_empty() {
        detalle.push_str(&format!("<li>Tema: {}</li>", escape(&cita.tema)));
    }
    detalle.push_str("</ul>");
    detalle
}

/// To the receptor of a newly proposed cita.
pub fn cita_propuesta(evento: &EventoConfig, cita: &Cita) -> EmailMessage {
    let body = format!(
        "<p>Hola {},</p><p>{} te propone una cita:</p>{}\
         <p>Entra a tu portal para aceptarla o rechazarla.</p>",
        escape(&cita.receptor.nombre),
        escape(&cita.solicitante.nombre),
        cita_detalle(cita)
    );
    message(
        &cita.receptor.email,
        format!("Nueva solicitud de cita - {}", evento.nombre),
        layout(evento, "Nueva solicitud de cita", &body),
    )
}

/// To whoever proposed the time that was just accepted.
pub fn cita_aceptada(evento: &EventoConfig, cita: &Cita, to: &str, nombre: &str, por: &str) -> EmailMessage {
    let body = format!(
        "<p>Hola {},</p><p>{} aceptó la cita:</p>{}",
        escape(nombre),
        escape(por),
        cita_detalle(cita)
    );
    message(
        to,
        format!("Cita confirmada - {}", evento.nombre),
        layout(evento, "Cita confirmada", &body),
    )
}

pub fn cita_rechazada(evento: &EventoConfig, cita: &Cita, to: &str, nombre: &str, por: &str) -> EmailMessage {
    let motivo = cita
        .motivo_rechazo
        .as_deref()
        .filter(|m| !m.trim().is_empty())
        .map(|m| format!("<p>Motivo: {}</p>", escape(m)))
        .unwrap_or_default();
    let body = format!(
        "<p>Hola {},</p><p>{} rechazó la cita:</p>{}{}",
        escape(nombre),
        escape(por),
        cita_detalle(cita),
        motivo
    );
    message(
        to,
        format!("Cita rechazada - {}", evento.nombre),
        layout(evento, "Cita rechazada", &body),
    )
}

pub fn cita_reagendada(evento: &EventoConfig, cita: &Cita, to: &str, nombre: &str, por: &str) -> EmailMessage {
    let body = format!(
        "<p>Hola {},</p><p>{} propone un nuevo horario para su cita:</p>{}\
         <p>Entra a tu portal para aceptarlo o rechazarlo.</p>",
        escape(nombre),
        escape(por),
        cita_detalle(cita)
    );
    message(
        to,
        format!("Cita reagendada - {}", evento.nombre),
        layout(evento, "Cita reagendada", &body),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use expo_config::AppConfig;

    #[test]
    fn user_text_is_escaped() {
        let evento = AppConfig::default().evento;
        let msg = registro_confirmado(&evento, "a@b.c", "<script>", "AB12CD34");
        assert!(msg.html.contains("&lt;script&gt;"));
        assert!(!msg.html.contains("<script>"));
        assert!(msg.html.contains("AB12CD34"));
        assert!(msg.subject.starts_with("Registro confirmado"));
    }

    #[test]
    fn invitation_carries_the_link() {
        let evento = AppConfig::default().evento;
        let msg = invitacion(
            &evento,
            "a@b.c",
            "Ana",
            "https://expo.mx/registro?invitacion=c1&token=ab",
        );
        assert!(msg
            .html
            .contains("https://expo.mx/registro?invitacion=c1&amp;token=ab"));
        assert_eq!(msg.to, "a@b.c");
    }
}
