//! Static catalog of quote complements (accessories and services).

use super::pricing::PricingMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogItem {
    pub sku: &'static str,
    pub name: &'static str,
    pub pricing_mode: PricingMode,
    pub unit: &'static str,
    /// Unit price in centavos.
    pub unit_price: i64,
    pub description: &'static str,
}

impl CatalogItem {
    pub fn is_accessory(&self) -> bool {
        self.sku.starts_with("ACESS")
    }
}

const fn item(
    sku: &'static str,
    name: &'static str,
    pricing_mode: PricingMode,
    unit: &'static str,
    unit_price: i64,
    description: &'static str,
) -> CatalogItem {
    CatalogItem {
        sku,
        name,
        pricing_mode,
        unit,
        unit_price,
        description,
    }
}

static CATALOG: &[CatalogItem] = &[
    item(
        "ACESS-001",
        "Garfo Paleteiro",
        PricingMode::Mensal,
        "unidade",
        50_000,
        "Garfo para movimentação de paletes",
    ),
    item(
        "ACESS-002",
        "Balde de Concreto",
        PricingMode::Mensal,
        "unidade",
        30_000,
        "Balde para transporte de concreto",
    ),
    item(
        "ACESS-003",
        "Caçamba de Entulho",
        PricingMode::Mensal,
        "unidade",
        40_000,
        "Caçamba para descarte de entulho",
    ),
    item(
        "ACESS-004",
        "Plataforma de Descarga",
        PricingMode::Mensal,
        "unidade",
        60_000,
        "Plataforma para descarga de materiais nos pavimentos",
    ),
    item(
        "ACESS-005",
        "Estaiamentos",
        PricingMode::PorMetro,
        "m",
        65_000,
        "Estaiamentos para fixação lateral da grua",
    ),
    item(
        "ACESS-006",
        "Chumbadores/Base de Fundação",
        PricingMode::Unico,
        "unidade",
        150_000,
        "Peças de ancoragem concretadas no bloco da grua",
    ),
    item(
        "ACESS-007",
        "Auto-transformador (Energia)",
        PricingMode::Mensal,
        "unidade",
        80_000,
        "Adequação elétrica 220/380V",
    ),
    item(
        "ACESS-008",
        "Plano de Rigging / ART de Engenheiro",
        PricingMode::Unico,
        "unidade",
        500_000,
        "Projeto técnico e responsabilidade civil",
    ),
    item(
        "ACESS-012",
        "Seguro RC / Roubo",
        PricingMode::Mensal,
        "unidade",
        120_000,
        "Seguro de responsabilidade civil e riscos",
    ),
    item(
        "SERV-001",
        "Serviço de Montagem",
        PricingMode::PorHora,
        "h",
        15_000,
        "Mão de obra para montagem e fixação da grua",
    ),
    item(
        "SERV-002",
        "Serviço de Desmontagem",
        PricingMode::PorHora,
        "h",
        15_000,
        "Mão de obra para desmontagem da grua",
    ),
    item(
        "SERV-003",
        "Ascensão da Torre",
        PricingMode::PorMetro,
        "m",
        65_000,
        "Serviço de elevação da torre conforme a obra cresce",
    ),
    item(
        "SERV-004",
        "Transporte de Ida e Retorno",
        PricingMode::Unico,
        "unidade",
        300_000,
        "Transporte da grua até a obra e retorno ao depósito",
    ),
    item(
        "SERV-005",
        "Serviço de Operador",
        PricingMode::Mensal,
        "unidade",
        800_000,
        "Locação mensal de operador de grua",
    ),
    item(
        "SERV-006",
        "Serviço de Sinaleiro",
        PricingMode::Mensal,
        "unidade",
        600_000,
        "Locação mensal de sinaleiro",
    ),
    item(
        "SERV-007",
        "Serviço de Manutenção Preventiva",
        PricingMode::Mensal,
        "unidade",
        200_000,
        "Manutenção preventiva mensal da grua",
    ),
    item(
        "SERV-008",
        "Serviço de Manutenção Corretiva",
        PricingMode::PorHora,
        "h",
        20_000,
        "Serviço de manutenção corretiva (cobrado por hora)",
    ),
    item(
        "SERV-009",
        "Serviço de Técnico de Segurança",
        PricingMode::PorDia,
        "dia",
        50_000,
        "Serviço de técnico de segurança (NR-18)",
    ),
    item(
        "SERV-010",
        "Consultoria Técnica",
        PricingMode::PorHora,
        "h",
        25_000,
        "Consultoria técnica especializada",
    ),
    item(
        "SERV-011",
        "Treinamento de Operadores",
        PricingMode::Unico,
        "unidade",
        150_000,
        "Treinamento e capacitação de operadores",
    ),
    item(
        "SERV-012",
        "Inspeção Técnica",
        PricingMode::Unico,
        "unidade",
        80_000,
        "Inspeção técnica periódica da grua",
    ),
];

pub fn all() -> &'static [CatalogItem] {
    CATALOG
}

pub fn find(sku: &str) -> Option<&'static CatalogItem> {
    CATALOG.iter().find(|item| item.sku.eq_ignore_ascii_case(sku.trim()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn skus_are_unique() {
        let skus: HashSet<_> = all().iter().map(|item| item.sku).collect();
        assert_eq!(skus.len(), all().len());
    }

    #[test]
    fn lookup_is_case_insensitive() {
        let item = find(" serv-004 ").expect("transport service");
        assert_eq!(item.name, "Transporte de Ida e Retorno");
        assert_eq!(item.pricing_mode, PricingMode::Unico);
        assert!(!item.is_accessory());
        assert!(find("ACESS-999").is_none());
    }
}
