use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

const BASE_INSTRUCTION: &str = "Você é um Analista Jurídico e Técnico, especialista em Compras \
Públicas Brasileiras e na Lei nº 14.133/2021. Redija um documento técnico oficial, formal, \
estruturado com títulos claros e pronto para uso.";

/// Procurement document templates the generator knows how to draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE", try_from = "String")]
pub enum DocumentKind {
    /// Documento de Formalização da Demanda.
    Dfd,
    /// Estudo Técnico Preliminar.
    Etp,
    /// Termo de Referência.
    Tr,
    Edital,
    Oficio,
    Analise,
    Contrato,
}

impl DocumentKind {
    pub const ALL: [DocumentKind; 7] = [
        DocumentKind::Dfd,
        DocumentKind::Etp,
        DocumentKind::Tr,
        DocumentKind::Edital,
        DocumentKind::Oficio,
        DocumentKind::Analise,
        DocumentKind::Contrato,
    ];

    pub fn code(self) -> &'static str {
        match self {
            DocumentKind::Dfd => "DFD",
            DocumentKind::Etp => "ETP",
            DocumentKind::Tr => "TR",
            DocumentKind::Edital => "EDITAL",
            DocumentKind::Oficio => "OFICIO",
            DocumentKind::Analise => "ANALISE",
            DocumentKind::Contrato => "CONTRATO",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DocumentKind::Dfd => "Documento de Formalização da Demanda",
            DocumentKind::Etp => "Estudo Técnico Preliminar",
            DocumentKind::Tr => "Termo de Referência",
            DocumentKind::Edital => "Minuta de Edital",
            DocumentKind::Oficio => "Ofício",
            DocumentKind::Analise => "Análise Técnica",
            DocumentKind::Contrato => "Minuta de Contrato",
        }
    }

    fn sections(self) -> &'static [&'static str] {
        match self {
            DocumentKind::Dfd => &[
                "Justificativa da Necessidade",
                "Requisitos Preliminares",
                "Estimativa de Quantidade e Prazo",
                "Previsão de Data para Início da Contratação",
            ],
            DocumentKind::Etp => &[
                "Descrição da Necessidade",
                "Análise de Soluções e Alternativas",
                "Requisitos Mínimos e Máximos",
                "Levantamento de Mercado",
                "Estimativa de Valor",
                "Previsão de Contratação",
                "Riscos e Mitigação",
            ],
            DocumentKind::Tr => &[
                "Objeto e Justificativa",
                "Especificações Técnicas",
                "Obrigações da Contratada",
                "Modelo de Execução e Fiscalização",
                "Critérios de Aceitação do Objeto",
                "Condições de Pagamento e Sanções",
            ],
            DocumentKind::Edital => &[
                "Preâmbulo",
                "Objeto da Licitação",
                "Condições de Participação e Habilitação",
                "Critérios de Julgamento das Propostas",
                "Recursos Orçamentários",
                "Sanções Administrativas",
                "Disposições Finais",
            ],
            DocumentKind::Oficio => &[
                "Local e Data",
                "Número do Ofício",
                "Destinatário",
                "Assunto",
                "Corpo do Texto",
                "Fecho",
                "Espaço para Assinatura",
            ],
            DocumentKind::Analise => &[
                "Resumo Executivo",
                "Conformidade Legal",
                "Riscos e Irregularidades",
                "Recomendações",
                "Conclusão Fundamentada",
            ],
            DocumentKind::Contrato => &[
                "Partes",
                "Objeto",
                "Valor e Condições de Pagamento",
                "Vigência",
                "Obrigações das Partes",
                "Sanções",
                "Foro",
            ],
        }
    }

    /// System instruction: the shared analyst persona plus this kind's mandatory sections.
    pub fn instruction(self) -> String {
        let sections = self
            .sections()
            .iter()
            .enumerate()
            .map(|(index, section)| format!("{}. {}", index + 1, section))
            .collect::<Vec<_>>()
            .join(", ");
        format!(
            "{BASE_INSTRUCTION} Gere um(a) {} com as seções obrigatórias: {sections}.",
            self.label()
        )
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown document kind '{0}'")]
pub struct UnknownKind(pub String);

impl FromStr for DocumentKind {
    type Err = UnknownKind;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let normalized = raw
            .trim()
            .to_uppercase()
            .replace('Í', "I")
            .replace('Á', "A")
            .replace(' ', "_");
        match normalized.as_str() {
            "DFD" => Ok(DocumentKind::Dfd),
            "ETP" => Ok(DocumentKind::Etp),
            "TR" | "TERMO_REFERENCIA" | "TERMO_DE_REFERENCIA" => Ok(DocumentKind::Tr),
            "EDITAL" => Ok(DocumentKind::Edital),
            "OFICIO" => Ok(DocumentKind::Oficio),
            "ANALISE" => Ok(DocumentKind::Analise),
            "CONTRATO" => Ok(DocumentKind::Contrato),
            _ => Err(UnknownKind(raw.to_string())),
        }
    }
}

impl TryFrom<String> for DocumentKind {
    type Error = UnknownKind;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
