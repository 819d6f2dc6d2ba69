//! Rental quote cost model.
//!
//! A quote aggregates three kinds of lines: recurring monthly costs, one-time
//! fixed values (rental quotes only) and complements picked from the static
//! catalog. Every amount is in centavos.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;
use validator::Validate;

use super::catalog;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PricingMode {
    Mensal,
    Unico,
    PorMetro,
    PorHora,
    PorDia,
}

impl PricingMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            PricingMode::Mensal => "mensal",
            PricingMode::Unico => "unico",
            PricingMode::PorMetro => "por_metro",
            PricingMode::PorHora => "por_hora",
            PricingMode::PorDia => "por_dia",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum QuoteKind {
    /// Crane rental; accepts fixed-value lines.
    Locacao,
    /// Construction-site quote.
    Obra,
}

impl QuoteKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuoteKind::Locacao => "locacao",
            QuoteKind::Obra => "obra",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ItemType {
    Equipamento,
    Servico,
}

impl ItemType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemType::Equipamento => "equipamento",
            ItemType::Servico => "servico",
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema, Validate)]
pub struct MonthlyCostLine {
    #[validate(length(min = 1, message = "cost type is required"))]
    pub cost_type: String,
    #[validate(length(min = 1, message = "description is required"))]
    pub description: String,
    #[validate(range(min = 0, message = "monthly value must not be negative"))]
    pub monthly_value: i64,
    #[serde(default)]
    pub required: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema, Validate)]
pub struct FixedValueLine {
    #[validate(length(min = 1, message = "value type is required"))]
    pub value_type: String,
    #[validate(length(min = 1, message = "description is required"))]
    pub description: String,
    #[validate(range(min = 1, message = "quantity must be at least 1"))]
    pub quantity: i32,
    #[validate(range(min = 0, message = "unit value must not be negative"))]
    pub unit_value: i64,
}

/// A complement picked from the catalog.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema, Validate)]
pub struct ComplementSelection {
    #[validate(length(min = 1, message = "sku is required"))]
    pub sku: String,
    #[validate(range(min = 1, message = "quantity must be at least 1"))]
    pub quantity: i32,
    /// Total already computed for metered lines (meters, hours or days).
    #[validate(range(min = 0, message = "total must not be negative"))]
    pub valor_total: Option<i64>,
}

#[derive(Debug, Clone, Serialize, ToSchema, PartialEq)]
pub struct PricedMonthlyCost {
    pub cost_type: String,
    pub description: String,
    pub monthly_value: i64,
    pub required: bool,
    pub total: i64,
}

#[derive(Debug, Clone, Serialize, ToSchema, PartialEq)]
pub struct PricedFixedValue {
    pub value_type: String,
    pub description: String,
    pub quantity: i32,
    pub unit_value: i64,
    pub total: i64,
}

#[derive(Debug, Clone, Serialize, ToSchema, PartialEq)]
pub struct PricedComplement {
    pub sku: String,
    pub name: String,
    pub description: String,
    pub pricing_mode: PricingMode,
    pub unit: String,
    pub item_type: ItemType,
    /// Billed quantity; monthly complements bill `quantity × months`.
    pub quantity: i32,
    pub unit_price: i64,
    pub total: i64,
}

#[derive(Debug, Clone, Serialize, ToSchema, PartialEq)]
pub struct QuoteBreakdown {
    pub lease_months: i32,
    pub monthly_costs: Vec<PricedMonthlyCost>,
    pub fixed_values: Vec<PricedFixedValue>,
    pub complements: Vec<PricedComplement>,
    /// Sum of the monthly values for a single month.
    pub monthly_subtotal: i64,
    pub monthly_total: i64,
    pub fixed_total: i64,
    pub complements_total: i64,
    pub grand_total: i64,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PricingError {
    #[error("lease duration must be at least one month, got {0}")]
    InvalidLeaseMonths(i32),
    #[error("unknown complement sku {0}")]
    UnknownSku(String),
    #[error("quantity for {0} must be at least 1")]
    InvalidQuantity(String),
    #[error("negative amount in {0}")]
    NegativeAmount(String),
    #[error("fixed-value lines are only accepted on rental quotes")]
    FixedValuesNotAllowed,
    #[error("quote total overflows")]
    Overflow,
}

pub struct QuoteLines<'a> {
    pub monthly_costs: &'a [MonthlyCostLine],
    pub fixed_values: &'a [FixedValueLine],
    pub complements: &'a [ComplementSelection],
}

/// Price every line of a quote and its grand total.
pub fn price_quote(
    kind: QuoteKind,
    lease_months: i32,
    lines: QuoteLines<'_>,
) -> Result<QuoteBreakdown, PricingError> {
    if lease_months < 1 {
        return Err(PricingError::InvalidLeaseMonths(lease_months));
    }
    if kind == QuoteKind::Obra && !lines.fixed_values.is_empty() {
        return Err(PricingError::FixedValuesNotAllowed);
    }
    let months = i64::from(lease_months);

    let monthly_costs = lines
        .monthly_costs
        .iter()
        .map(|line| {
            if line.monthly_value < 0 {
                return Err(PricingError::NegativeAmount(line.description.clone()));
            }
            Ok(PricedMonthlyCost {
                cost_type: line.cost_type.clone(),
                description: line.description.clone(),
                monthly_value: line.monthly_value,
                required: line.required,
                total: mul(line.monthly_value, months)?,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let fixed_values = lines
        .fixed_values
        .iter()
        .map(|line| {
            if line.quantity < 1 {
                return Err(PricingError::InvalidQuantity(line.description.clone()));
            }
            if line.unit_value < 0 {
                return Err(PricingError::NegativeAmount(line.description.clone()));
            }
            Ok(PricedFixedValue {
                value_type: line.value_type.clone(),
                description: line.description.clone(),
                quantity: line.quantity,
                unit_value: line.unit_value,
                total: mul(line.unit_value, i64::from(line.quantity))?,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let complements = lines
        .complements
        .iter()
        .map(|selection| price_complement(selection, lease_months))
        .collect::<Result<Vec<_>, _>>()?;

    let monthly_subtotal = sum(monthly_costs.iter().map(|line| line.monthly_value))?;
    let monthly_total = sum(monthly_costs.iter().map(|line| line.total))?;
    let fixed_total = sum(fixed_values.iter().map(|line| line.total))?;
    let complements_total = sum(complements.iter().map(|line| line.total))?;
    let grand_total = sum([monthly_total, fixed_total, complements_total])?;

    Ok(QuoteBreakdown {
        lease_months,
        monthly_costs,
        fixed_values,
        complements,
        monthly_subtotal,
        monthly_total,
        fixed_total,
        complements_total,
        grand_total,
    })
}

fn price_complement(
    selection: &ComplementSelection,
    lease_months: i32,
) -> Result<PricedComplement, PricingError> {
    let item = catalog::find(&selection.sku)
        .ok_or_else(|| PricingError::UnknownSku(selection.sku.clone()))?;
    if selection.quantity < 1 {
        return Err(PricingError::InvalidQuantity(item.sku.to_string()));
    }
    let quantity = i64::from(selection.quantity);

    let (billed_quantity, total) = match item.pricing_mode {
        PricingMode::Mensal => {
            let billed = selection
                .quantity
                .checked_mul(lease_months)
                .ok_or(PricingError::Overflow)?;
            let total = mul(mul(item.unit_price, quantity)?, i64::from(lease_months))?;
            (billed, total)
        }
        PricingMode::Unico => (selection.quantity, mul(item.unit_price, quantity)?),
        PricingMode::PorMetro | PricingMode::PorHora | PricingMode::PorDia => {
            let total = match selection.valor_total {
                Some(total) if total < 0 => {
                    return Err(PricingError::NegativeAmount(item.sku.to_string()));
                }
                Some(total) if total > 0 => total,
                _ => mul(item.unit_price, quantity)?,
            };
            (selection.quantity, total)
        }
    };

    let item_type = if item.is_accessory() {
        ItemType::Equipamento
    } else {
        ItemType::Servico
    };

    Ok(PricedComplement {
        sku: item.sku.to_string(),
        name: item.name.to_string(),
        description: item.description.to_string(),
        pricing_mode: item.pricing_mode,
        unit: item.unit.to_string(),
        item_type,
        quantity: billed_quantity,
        unit_price: item.unit_price,
        total,
    })
}

fn mul(a: i64, b: i64) -> Result<i64, PricingError> {
    a.checked_mul(b).ok_or(PricingError::Overflow)
}

fn sum(values: impl IntoIterator<Item = i64>) -> Result<i64, PricingError> {
    values
        .into_iter()
        .try_fold(0_i64, |acc, v| acc.checked_add(v))
        .ok_or(PricingError::Overflow)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn monthly(description: &str, value: i64) -> MonthlyCostLine {
        MonthlyCostLine {
            cost_type: "locacao".into(),
            description: description.into(),
            monthly_value: value,
            required: true,
        }
    }

    fn complement(sku: &str, quantity: i32, valor_total: Option<i64>) -> ComplementSelection {
        ComplementSelection {
            sku: sku.into(),
            quantity,
            valor_total,
        }
    }

    fn price(
        kind: QuoteKind,
        months: i32,
        monthly: &[MonthlyCostLine],
        fixed: &[FixedValueLine],
        complements: &[ComplementSelection],
    ) -> Result<QuoteBreakdown, PricingError> {
        price_quote(
            kind,
            months,
            QuoteLines {
                monthly_costs: monthly,
                fixed_values: fixed,
                complements,
            },
        )
    }

    #[test]
    fn metered_complement_with_zero_total_uses_unit_price() {
        let priced = price(QuoteKind::Locacao, 3, &[], &[], &[complement("SERV-001", 10, Some(0))])
            .unwrap();
        assert_eq!(priced.complements_total, 150_000);

        let carried =
            price(QuoteKind::Locacao, 3, &[], &[], &[complement("SERV-001", 10, Some(90_000))])
                .unwrap();
        assert_eq!(carried.complements_total, 90_000);
    }

    #[test]
    fn thirteen_month_rental_with_transport() {
        // R$15.000,00 monthly rental over 13 months plus one-time transport R$3.000,00.
        let breakdown = price(
            QuoteKind::Locacao,
            13,
            &[monthly("Locação", 1_500_000)],
            &[],
            &[complement("SERV-004", 1, None)],
        )
        .unwrap();

        assert_eq!(breakdown.monthly_costs[0].total, 19_500_000);
        assert_eq!(breakdown.complements[0].total, 300_000);
        assert_eq!(breakdown.grand_total, 19_800_000);
    }

    #[test]
    fn monthly_line_scales_with_duration() {
        for months in [1, 6, 24] {
            let breakdown =
                price(QuoteKind::Obra, months, &[monthly("Operador", 800_000)], &[], &[]).unwrap();
            assert_eq!(breakdown.monthly_total, 800_000 * i64::from(months));
            assert_eq!(breakdown.monthly_subtotal, 800_000);
        }
    }

    #[test]
    fn monthly_complement_bills_quantity_times_months() {
        let breakdown = price(
            QuoteKind::Locacao,
            4,
            &[],
            &[],
            &[complement("ACESS-001", 2, None)],
        )
        .unwrap();
        let line = &breakdown.complements[0];
        assert_eq!(line.total, 50_000 * 2 * 4);
        assert_eq!(line.quantity, 8);
        assert_eq!(line.item_type, ItemType::Equipamento);
    }

    #[test]
    fn one_time_complement_ignores_duration() {
        let short =
            price(QuoteKind::Locacao, 1, &[], &[], &[complement("SERV-011", 3, None)]).unwrap();
        let long =
            price(QuoteKind::Locacao, 36, &[], &[], &[complement("SERV-011", 3, None)]).unwrap();
        assert_eq!(short.complements_total, 450_000);
        assert_eq!(long.complements_total, 450_000);
    }

    #[test]
    fn metered_complement_uses_carried_total() {
        let breakdown = price(
            QuoteKind::Locacao,
            12,
            &[],
            &[],
            &[
                complement("SERV-001", 10, Some(150_000)),
                complement("SERV-009", 3, None),
            ],
        )
        .unwrap();
        assert_eq!(breakdown.complements[0].total, 150_000);
        assert_eq!(breakdown.complements[0].quantity, 10);
        assert_eq!(breakdown.complements[1].total, 150_000);
        assert_eq!(breakdown.complements[1].item_type, ItemType::Servico);
    }

    #[test]
    fn grand_total_sums_each_category_once() {
        let fixed = [FixedValueLine {
            value_type: "montagem".into(),
            description: "Montagem".into(),
            quantity: 2,
            unit_value: 250_000,
        }];
        let breakdown = price(
            QuoteKind::Locacao,
            3,
            &[monthly("Locação", 1_000_000), monthly("Sinaleiro", 600_000)],
            &fixed,
            &[complement("ACESS-006", 1, None)],
        )
        .unwrap();

        assert_eq!(breakdown.monthly_total, 4_800_000);
        assert_eq!(breakdown.fixed_total, 500_000);
        assert_eq!(breakdown.complements_total, 150_000);
        assert_eq!(
            breakdown.grand_total,
            breakdown.monthly_total + breakdown.fixed_total + breakdown.complements_total
        );
    }

    #[test]
    fn construction_quote_rejects_fixed_values() {
        let fixed = [FixedValueLine {
            value_type: "frete".into(),
            description: "Frete".into(),
            quantity: 1,
            unit_value: 10_000,
        }];
        let err = price(QuoteKind::Obra, 2, &[], &fixed, &[]).unwrap_err();
        assert_eq!(err, PricingError::FixedValuesNotAllowed);
    }

    #[test]
    fn rejects_bad_inputs() {
        assert_eq!(
            price(QuoteKind::Locacao, 0, &[], &[], &[]).unwrap_err(),
            PricingError::InvalidLeaseMonths(0)
        );
        assert_eq!(
            price(QuoteKind::Locacao, 1, &[], &[], &[complement("NOPE", 1, None)]).unwrap_err(),
            PricingError::UnknownSku("NOPE".into())
        );
        assert!(matches!(
            price(QuoteKind::Locacao, 1, &[], &[], &[complement("SERV-004", 0, None)]),
            Err(PricingError::InvalidQuantity(_))
        ));
        assert!(matches!(
            price(QuoteKind::Locacao, 1, &[monthly("x", -1)], &[], &[]),
            Err(PricingError::NegativeAmount(_))
        ));
    }

    #[test]
    fn overflow_is_reported() {
        let err = price(QuoteKind::Locacao, 2, &[monthly("huge", i64::MAX)], &[], &[]).unwrap_err();
        assert_eq!(err, PricingError::Overflow);
    }
}
