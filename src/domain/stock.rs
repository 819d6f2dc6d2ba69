use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

pub const UNITS: &[&str] = &["UN", "KG", "M", "L", "M2", "M3", "UNIDADE", "PECA", "CAIXA"];

pub fn is_valid_unit(unit: &str) -> bool {
    UNITS.contains(&unit)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum StockStatus {
    #[serde(rename = "Estoque Baixo")]
    EstoqueBaixo,
    #[serde(rename = "Atenção")]
    Atencao,
    #[serde(rename = "Normal")]
    Normal,
}

impl StockStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            StockStatus::EstoqueBaixo => "Estoque Baixo",
            StockStatus::Atencao => "Atenção",
            StockStatus::Normal => "Normal",
        }
    }
}

/// Badge for the available quantity against the product's minimum.
pub fn stock_status(available: i32, min_stock: i32) -> StockStatus {
    let available = i64::from(available);
    let min = i64::from(min_stock);
    // available <= 1.5 * min, kept in integers
    if available <= min {
        StockStatus::EstoqueBaixo
    } else if available * 2 <= min * 3 {
        StockStatus::Atencao
    } else {
        StockStatus::Normal
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum MovementType {
    Entrada,
    Saida,
    Ajuste,
}

impl MovementType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MovementType::Entrada => "ENTRADA",
            MovementType::Saida => "SAIDA",
            MovementType::Ajuste => "AJUSTE",
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StockError {
    #[error("insufficient stock: {available} available, {requested} requested")]
    Insufficient { available: i32, requested: i32 },
    #[error("quantity must be positive")]
    NonPositive,
    #[error("adjusted quantity must not be negative")]
    NegativeAdjustment,
    #[error("stock quantity overflow")]
    Overflow,
}

/// Quantity after applying a movement to `current`.
pub fn apply_movement(current: i32, kind: MovementType, quantity: i32) -> Result<i32, StockError> {
    match kind {
        MovementType::Entrada => {
            if quantity <= 0 {
                return Err(StockError::NonPositive);
            }
            current.checked_add(quantity).ok_or(StockError::Overflow)
        }
        MovementType::Saida => {
            if quantity <= 0 {
                return Err(StockError::NonPositive);
            }
            if quantity > current {
                return Err(StockError::Insufficient {
                    available: current,
                    requested: quantity,
                });
            }
            Ok(current - quantity)
        }
        MovementType::Ajuste => {
            if quantity < 0 {
                return Err(StockError::NegativeAdjustment);
            }
            Ok(quantity)
        }
    }
}

pub fn stock_value(available: i32, unit_price: i64) -> i64 {
    i64::from(available).saturating_mul(unit_price)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn badge_thresholds() {
        assert_eq!(stock_status(80, 100), StockStatus::EstoqueBaixo);
        assert_eq!(stock_status(100, 100), StockStatus::EstoqueBaixo);
        assert_eq!(stock_status(140, 100), StockStatus::Atencao);
        assert_eq!(stock_status(150, 100), StockStatus::Atencao);
        assert_eq!(stock_status(151, 100), StockStatus::Normal);
        assert_eq!(stock_status(200, 100), StockStatus::Normal);
    }

    #[test]
    fn zero_minimum() {
        assert_eq!(stock_status(0, 0), StockStatus::EstoqueBaixo);
        assert_eq!(stock_status(1, 0), StockStatus::Normal);
    }

    #[test]
    fn movements() {
        assert_eq!(apply_movement(10, MovementType::Entrada, 5), Ok(15));
        assert_eq!(apply_movement(10, MovementType::Saida, 10), Ok(0));
        assert_eq!(
            apply_movement(10, MovementType::Saida, 11),
            Err(StockError::Insufficient {
                available: 10,
                requested: 11
            })
        );
        assert_eq!(apply_movement(10, MovementType::Ajuste, 3), Ok(3));
        assert_eq!(apply_movement(10, MovementType::Ajuste, 0), Ok(0));
        assert_eq!(apply_movement(10, MovementType::Entrada, 0), Err(StockError::NonPositive));
        assert_eq!(
            apply_movement(10, MovementType::Ajuste, -1),
            Err(StockError::NegativeAdjustment)
        );
    }

    #[test]
    fn units() {
        assert!(is_valid_unit("M3"));
        assert!(!is_valid_unit("m3"));
        assert!(!is_valid_unit("TON"));
    }
}
