use crate::workflows::settings::SettingsView;

/// Signature lines printed at the foot of every official document.
pub const SIGNATURE_ROLES: [&str; 2] = ["Responsável Técnico", "Gestor Autorizador"];

const RULE: &str = "________________________________________";

/// Wrap a generated body in the organization letterhead and the signature block.
pub fn format_official(body: &str, organization: &SettingsView) -> String {
    let mut document = String::with_capacity(body.len() + 256);
    document.push_str(&organization.org_name.to_uppercase());
    document.push('\n');
    document.push_str(&format!("Estado de {}\n", organization.state));
    document.push_str(RULE);
    document.push_str("\n\n");
    document.push_str(body.trim());
    document.push_str("\n\n\n");

    for role in SIGNATURE_ROLES {
        document.push_str(RULE);
        document.push('\n');
        document.push_str(role);
        document.push_str("\n\n");
    }
    document.truncate(document.trim_end().len());
    document
}

#[cfg(test)]
mod tests {
    use super::*;

    fn organization(name: &str, state: &str) -> SettingsView {
        SettingsView {
            org_name: name.to_string(),
            state: state.to_string(),
            logo_data: None,
            configured: true,
        }
    }

    #[test]
    fn letterhead_then_body_then_signatures() {
        let formatted = format_official(
            "\n1. OBJETO\nAquisição de notebooks.\n",
            &organization("Prefeitura de Sobral", "Ceará"),
        );
        let lines: Vec<&str> = formatted.lines().collect();
        assert_eq!(lines[0], "PREFEITURA DE SOBRAL");
        assert_eq!(lines[1], "Estado de Ceará");
        assert_eq!(lines[4], "1. OBJETO");

        let technical = formatted.find("Responsável Técnico").expect("first signature");
        let manager = formatted.find("Gestor Autorizador").expect("second signature");
        assert!(formatted.find("Aquisição de notebooks.").expect("body") < technical);
        assert!(technical < manager);
        assert!(formatted.ends_with("Gestor Autorizador"));
    }
}
