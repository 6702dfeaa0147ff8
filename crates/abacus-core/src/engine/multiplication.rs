//! Long multiplication with shifted partial products.

use crate::error::{Result, TutorError};
use crate::exercise::Topic;
use crate::number::{digits_lsb, pow10};
use crate::step::{AnswerKind, Focus, HintKind, PlannedStep, ProductCell, StepPlan};

use super::StepEngine;

/// Multiplies a multiplicand by each digit of the multiplier.
///
/// Every multiplicand digit of every row is one step. Inside a row each
/// step writes `product mod 10` and carries the rest, except the row's last
/// digit: there is no column left to carry into, so it expects the whole
/// `product`. A multi-digit multiplier adds one step that sums the shifted
/// rows.
#[derive(Debug, Clone, Copy)]
pub struct MultiplicationEngine<'a> {
    text: &'a str,
    multiplicand: u64,
    multiplier: u64,
}

impl<'a> MultiplicationEngine<'a> {
    /// Creates the engine for `multiplicand × multiplier`.
    #[must_use]
    pub const fn new(text: &'a str, multiplicand: u64, multiplier: u64) -> Self {
        Self {
            text,
            multiplicand,
            multiplier,
        }
    }

    /// Every single-digit multiplication, row by row.
    #[must_use]
    pub fn cells(&self) -> Vec<ProductCell> {
        let multiplicand_digits = digits_lsb(self.multiplicand);
        let last = multiplicand_digits.len() - 1;

        digits_lsb(self.multiplier)
            .into_iter()
            .enumerate()
            .flat_map(|(row, multiplier_digit)| {
                let mut carry = 0u64;
                multiplicand_digits
                    .iter()
                    .enumerate()
                    .map(move |(place_index, &multiplicand_digit)| {
                        let product =
                            u64::from(multiplicand_digit) * u64::from(multiplier_digit) + carry;
                        let cell = ProductCell {
                            row,
                            place_index,
                            multiplicand_digit,
                            multiplier_digit,
                            carry_in: carry,
                            product,
                            write_digit: u8::try_from(product % 10).unwrap_or_default(),
                            carry_out: product / 10,
                            is_last_in_row: place_index == last,
                        };
                        carry = cell.carry_out;
                        cell
                    })
                    .collect::<Vec<_>>()
            })
            .collect()
    }

    /// The partial product rows, each already shifted by its place value.
    ///
    /// Returns `None` if a row does not fit in a `u64`.
    #[must_use]
    pub fn partial_products(&self) -> Option<Vec<u64>> {
        digits_lsb(self.multiplier)
            .into_iter()
            .enumerate()
            .map(|(row, digit)| {
                self.multiplicand
                    .checked_mul(u64::from(digit))?
                    .checked_mul(pow10(row)?)
            })
            .collect()
    }
}

impl StepEngine for MultiplicationEngine<'_> {
    fn topic(&self) -> Topic {
        Topic::Multiplication
    }

    fn plan(&self) -> Result<StepPlan> {
        let product = self
            .multiplicand
            .checked_mul(self.multiplier)
            .ok_or_else(|| TutorError::too_large(self.text))?;
        let rows = self
            .partial_products()
            .ok_or_else(|| TutorError::too_large(self.text))?;

        let mut steps: Vec<PlannedStep> = self.cells().into_iter().map(cell_step).collect();

        if rows.len() > 1 {
            let sum = rows
                .iter()
                .map(u64::to_string)
                .collect::<Vec<_>>()
                .join(" + ");
            steps.push(
                PlannedStep::new(
                    HintKind::MulSum,
                    product.to_string(),
                    AnswerKind::Integer,
                    format!("Now add the rows: {sum}. What is the total?"),
                )
                .with_focus(Focus::Rows {
                    rows,
                    total: product,
                }),
            );
        }

        Ok(StepPlan::new(
            Topic::Multiplication,
            steps,
            HintKind::MulResult,
            product.to_string(),
            AnswerKind::Integer,
        ))
    }
}

fn cell_step(cell: ProductCell) -> PlannedStep {
    let computation = if cell.carry_in > 0 {
        format!(
            "{} × {} + {} (carried)",
            cell.multiplicand_digit, cell.multiplier_digit, cell.carry_in
        )
    } else {
        format!("{} × {}", cell.multiplicand_digit, cell.multiplier_digit)
    };
    let (expected, instruction) = if cell.is_last_in_row {
        (
            cell.product,
            "This is the last digit of the row, so write the whole number.",
        )
    } else {
        (
            u64::from(cell.write_digit),
            "Write the units digit and carry the tens.",
        )
    };
    PlannedStep::new(
        HintKind::MulPartial,
        expected.to_string(),
        AnswerKind::Integer,
        format!("Row {}: {computation} = ? {instruction}", cell.row + 1),
    )
    .with_focus(Focus::Product(cell))
}
