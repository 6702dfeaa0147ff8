//! Built-in hint texts per sub-step kind.
//!
//! Each generator returns three cumulative parts. Tier 1 shows the rule,
//! tier 2 appends the partial computation, tier 3 the full computation and
//! tier 4 the expected answer, so a higher tier always extends the text of
//! a lower one.

use crate::number::{pow10, Decimal};
use crate::step::{Column, DivisionWork, Focus, FractionWork, HintKind, ProductCell};

use super::{HintRequest, HintTier};

struct Parts {
    rule: String,
    partial: String,
    worked: String,
}

impl Parts {
    fn new(rule: impl Into<String>, partial: impl Into<String>, worked: impl Into<String>) -> Self {
        Self {
            rule: rule.into(),
            partial: partial.into(),
            worked: worked.into(),
        }
    }

    fn compose(self, tier: HintTier, expected: &str) -> String {
        let mut text = self.rule;
        if tier >= HintTier::Partial {
            text.push(' ');
            text.push_str(&self.partial);
        }
        if tier >= HintTier::Worked {
            text.push(' ');
            text.push_str(&self.worked);
        }
        if tier >= HintTier::Answer {
            text = format!("{text} The answer is {expected}.");
        }
        text
    }
}

/// The static hint for a request, or `None` when no generator matches.
pub(super) fn static_hint(request: &HintRequest) -> Option<String> {
    let parts = match (request.kind, &request.focus) {
        (HintKind::AddSimple, Focus::Operation { left, right, .. }) => add_simple(*left, *right),
        (HintKind::AddColumn, Focus::Column(column)) => add_column(column),
        (HintKind::AddCarry, Focus::Carry { carry, place_name }) => add_carry(*carry, place_name),
        (HintKind::SubSimple, Focus::Operation { left, right, .. }) => sub_simple(*left, *right),
        (HintKind::SubColumn, Focus::Column(column)) => sub_column(column),
        (HintKind::SubBorrow, Focus::Column(column)) => sub_borrow(column),
        (HintKind::MulPartial, Focus::Product(cell)) => mul_partial(cell),
        (HintKind::MulSum, Focus::Rows { rows, .. }) => mul_sum(rows),
        (HintKind::FracSameDenominator, Focus::Fraction(work)) => frac_same_denominator(work),
        (HintKind::FracLcm, Focus::Fraction(work)) => frac_lcm(work),
        (HintKind::FracEquivalent, Focus::Fraction(work)) => frac_equivalent(work),
        (HintKind::FracCombine, Focus::Fraction(work)) => frac_combine(work),
        (HintKind::FracSimplify, Focus::Fraction(work)) => frac_simplify(work),
        (HintKind::DivGroup, Focus::Division(work)) => div_group(work),
        (HintKind::DivQuotientDigit, Focus::Division(work)) => div_quotient_digit(work),
        (HintKind::DivSubtract, Focus::Division(work)) => div_subtract(work),
        (HintKind::DivBringDown, Focus::Division(work)) => div_bring_down(work)?,
        (
            kind @ (HintKind::DecAdd
            | HintKind::DecSubtract
            | HintKind::DecConvert
            | HintKind::DecMultiply
            | HintKind::DecPlacePoint
            | HintKind::DecDivisorPlaces
            | HintKind::DecDivide),
            Focus::Decimal {
                left,
                right,
                left_places,
                right_places,
                ..
            },
        ) => decimal(kind, left, right, *left_places, *right_places)?,
        (
            kind @ (HintKind::PercFraction | HintKind::PercMultiply | HintKind::PercDivide),
            Focus::Operation {
                left,
                right,
                operator: '%',
            },
        ) => percentage(kind, *left, *right)?,
        _ => return None,
    };
    Some(parts.compose(request.tier(), &request.expected))
}

fn dots(count: u64) -> String {
    "●".repeat(usize::try_from(count).unwrap_or(0))
}

fn add_simple(left: u64, right: u64) -> Parts {
    Parts::new(
        "Adding puts two groups together. Count all of them.",
        format!("Start at {left} and count on {right} more."),
        format!("{} and {}: count every dot.", dots(left), dots(right)),
    )
}

fn add_column(column: &Column) -> Parts {
    let place = &column.place_name;
    let carried = column.carry_in > 0;
    let rule = if carried {
        format!("Add the two digits of the {place} column and the 1 you carried. If the total is 10 or more, write its units digit and carry 1 to the next column.")
    } else {
        format!("Add the two digits of the {place} column. If the total is 10 or more, write its units digit and carry 1 to the next column.")
    };
    let (a, b, c) = (column.digit_a, column.digit_b, column.carry_in);
    let total = a + b + c;
    let partial = if carried {
        format!("In the {place} column you have {a} and {b}, plus the {c} you carried.")
    } else {
        format!("In the {place} column you have {a} and {b}.")
    };
    let sum = if carried {
        format!("{a} + {b} + {c} = {total}.")
    } else {
        format!("{a} + {b} = {total}.")
    };
    let worked = if total >= 10 {
        format!("{sum} That is 10 or more: which digit do you write, and what do you carry?")
    } else {
        format!("{sum} Which digit do you write?")
    };
    Parts::new(rule, partial, worked)
}

fn add_carry(carry: u8, place_name: &str) -> Parts {
    Parts::new(
        "A carry left over after the last column does not disappear: it starts a new column on the left.",
        "Look at the last column you added: its total was 10 or more.",
        format!("You carried {carry} into the {place_name} column and there is nothing else to add there. What do you write?"),
    )
}

fn sub_simple(left: u64, right: u64) -> Parts {
    Parts::new(
        "Subtracting takes some away. Start from the first number and remove the second.",
        format!("Start at {left} and count back {right} steps."),
        format!("You have {}. Cross out {right} of them and count what is left.", dots(left)),
    )
}

fn top_digit(column: &Column) -> i16 {
    i16::from(column.digit_a) - i16::from(column.carry_in)
}

fn sub_column(column: &Column) -> Parts {
    let place = &column.place_name;
    let top = top_digit(column);
    let b = column.digit_b;
    let rule = if column.carry_in > 0 {
        format!("Subtract the bottom digit from the top digit in the {place} column. Remember the top digit lent 1 to the column on its right.")
    } else {
        format!("Subtract the bottom digit from the top digit in the {place} column.")
    };
    Parts::new(
        rule,
        format!("The top digit is now {top} and the bottom digit is {b}."),
        format!("{top} - {b}: count up from {b} to {top}. How many steps is that?"),
    )
}

fn sub_borrow(column: &Column) -> Parts {
    let place = &column.place_name;
    let borrowed = top_digit(column) + 10;
    let b = column.digit_b;
    Parts::new(
        "When the top digit is smaller than the bottom digit, borrow 1 from the next column on the left. The top digit grows by 10.",
        format!("After borrowing, the top digit of the {place} column is {borrowed}."),
        format!("{borrowed} - {b}: count up from {b} to {borrowed}. Which digit do you write in the {place} column?"),
    )
}

fn mul_partial(cell: &ProductCell) -> Parts {
    let (m, d, carry) = (cell.multiplicand_digit, cell.multiplier_digit, cell.carry_in);
    let finish = if cell.is_last_in_row {
        "This is the last digit of the row, so write the whole result."
    } else {
        "Write the units digit and carry the tens."
    };
    let rule = format!("Multiply the digit on top by this row's digit, then add anything you carried. {finish}");

    let partial = match m {
        0 => "Any number times 0 is 0.".to_string(),
        1 => "Any number times 1 stays the same.".to_string(),
        _ => {
            let table = (1..m)
                .map(|k| format!("{d} × {k} = {}", u64::from(d) * u64::from(k)))
                .collect::<Vec<_>>()
                .join(", ");
            format!("The {d} times table: {table}, ...")
        }
    };

    let plain = u64::from(m) * u64::from(d);
    let computation = if carry > 0 {
        format!("{m} × {d} = {plain}, plus {carry} carried makes {}.", cell.product)
    } else {
        format!("{m} × {d} = {plain}.")
    };
    let worked = if cell.is_last_in_row {
        format!("{computation} What do you write?")
    } else {
        format!("{computation} Which units digit do you write, and what do you carry?")
    };
    Parts::new(rule, partial, worked)
}

fn mul_sum(rows: &[u64]) -> Parts {
    let listed = rows.iter().map(u64::to_string).collect::<Vec<_>>().join(" + ");
    let mut running = Vec::new();
    let mut total = rows.first().copied().unwrap_or(0);
    if let Some((last, middle)) = rows.get(1..).and_then(<[u64]>::split_last) {
        for row in middle {
            let next = total.saturating_add(*row);
            running.push(format!("{total} + {row} = {next}"));
            total = next;
        }
        running.push(format!("{total} + {last} = ?"));
    }
    Parts::new(
        "Add the rows together column by column, keeping the places lined up.",
        format!("The rows are {listed}."),
        format!("Add them one at a time: {}.", running.join(", ")),
    )
}

fn multiples_up_to(base: i64, limit: i64) -> String {
    if base <= 0 {
        return String::new();
    }
    let count = limit / base;
    let shown: Vec<String> = if count > 8 {
        (1..=4)
            .map(|k| (base * k).to_string())
            .chain(["...".to_string(), limit.to_string()])
            .collect()
    } else {
        (1..=count).map(|k| (base * k).to_string()).collect()
    };
    shown.join(", ")
}

fn frac_same_denominator(work: &FractionWork) -> Parts {
    let (d1, d2) = (work.first.denominator(), work.second.denominator());
    Parts::new(
        "The denominator is the number under the fraction line.",
        format!("The denominators are {d1} and {d2}."),
        format!("Compare {d1} and {d2}: are they the same number? Answer yes or no."),
    )
}

fn frac_lcm(work: &FractionWork) -> Parts {
    let (d1, d2) = (work.first.denominator(), work.second.denominator());
    let larger = d1.max(d2);
    Parts::new(
        "The least common multiple is the smallest number that both denominators divide into exactly.",
        format!(
            "Write the multiples of {larger}: {}, {}, {}, ...",
            larger,
            larger.saturating_mul(2),
            larger.saturating_mul(3)
        ),
        format!(
            "Multiples of {d1}: {}. Multiples of {d2}: {}. Which number is the first one in both lists?",
            multiples_up_to(d1, work.lcm),
            multiples_up_to(d2, work.lcm)
        ),
    )
}

fn frac_equivalent(work: &FractionWork) -> Parts {
    let (d1, d2) = (work.first.denominator(), work.second.denominator());
    let (n1, n2) = (work.first.numerator(), work.second.numerator());
    let (f1, f2, lcm) = (work.first_factor, work.second_factor, work.lcm);
    Parts::new(
        "Multiply the numerator and the denominator of each fraction by the same number.",
        format!("To reach {lcm}: {d1} × {f1} = {lcm} and {d2} × {f2} = {lcm}."),
        format!("So multiply the numerators too: {n1} × {f1} and {n2} × {f2}. What are the two new numerators?"),
    )
}

fn frac_combine(work: &FractionWork) -> Parts {
    let verb = if work.operator == '+' { "add" } else { "subtract" };
    let op = work.operator;
    Parts::new(
        format!("When the denominators match, {verb} the numerators and keep the denominator."),
        format!("The denominator stays {}.", work.lcm),
        format!(
            "{} {op} {} over {}. What fraction is that?",
            work.first_scaled, work.second_scaled, work.lcm
        ),
    )
}

fn frac_simplify(work: &FractionWork) -> Parts {
    let (numerator, denominator) = (work.combined, work.lcm);
    let worked = if work.gcd <= 1 {
        format!("{numerator} and {denominator} share no divisor bigger than 1, so the fraction is already as simple as it gets.")
    } else {
        format!(
            "Their greatest common divisor is {gcd}: divide {numerator} by {gcd} and {denominator} by {gcd}.",
            gcd = work.gcd
        )
    };
    Parts::new(
        "To simplify, divide the numerator and the denominator by the largest number that divides both.",
        format!(
            "Look for the greatest common divisor of {} and {denominator}.",
            numerator.unsigned_abs()
        ),
        worked,
    )
}

fn div_group(work: &DivisionWork) -> Parts {
    let divisor = work.divisor;
    Parts::new(
        "Start from the left of the number you divide. Take as few digits as you need to get a number at least as big as the divisor.",
        format!("The divisor is {divisor}."),
        format!("Read the first digit, then add one digit at a time, and stop as soon as the number is at least {divisor}. If that never happens, take the whole number."),
    )
}

fn div_quotient_digit(work: &DivisionWork) -> Parts {
    let (divisor, group, q) = (work.divisor, work.group, work.quotient_digit);
    let partial = if q >= 2 {
        let table = (1..q)
            .map(|k| format!("{divisor} × {k} = {}", divisor.saturating_mul(k)))
            .collect::<Vec<_>>()
            .join(", ");
        format!("Try the {divisor} times table: {table}, ...")
    } else {
        format!("Start with {divisor} × 1 = {divisor}.")
    };
    let worked = if q == 0 {
        format!("{divisor} × 1 = {divisor} is already bigger than {group}. How many times does it fit?")
    } else {
        format!(
            "{divisor} × {q} = {} fits into {group}, and {divisor} × {} = {} is too big. How many times does it fit?",
            divisor.saturating_mul(q),
            q + 1,
            divisor.saturating_mul(q + 1)
        )
    };
    Parts::new(
        "Find the biggest number that, times the divisor, still fits into the group.",
        partial,
        worked,
    )
}

fn div_subtract(work: &DivisionWork) -> Parts {
    let product = work.quotient_digit.saturating_mul(work.divisor);
    Parts::new(
        "Multiply the quotient digit by the divisor and take the result away from the group.",
        format!("{} × {} = {product}.", work.quotient_digit, work.divisor),
        format!("{} - {product}: how much is left?", work.group),
    )
}

fn div_bring_down(work: &DivisionWork) -> Option<Parts> {
    let next = work.next_digit?;
    let remainder = work.remainder;
    Some(Parts::new(
        "Bring the next digit of the dividend down next to what is left.",
        format!("What is left is {remainder} and the next digit is {next}."),
        format!("Write {next} to the right of {remainder}. Which number do you read?"),
    ))
}

fn power_of_ten(places: u32) -> Option<u64> {
    pow10(usize::try_from(places).ok()?)
}

fn decimal(
    kind: HintKind,
    left: &str,
    right: &str,
    left_places: u32,
    right_places: u32,
) -> Option<Parts> {
    let (a, b) = (Decimal::parse(left)?, Decimal::parse(right)?);
    let parts = match kind {
        HintKind::DecAdd | HintKind::DecSubtract => {
            let verb = if kind == HintKind::DecAdd { "add" } else { "subtract" };
            let places = left_places.max(right_places);
            Parts::new(
                format!("Line up the decimal points, then {verb} column by column as with whole numbers."),
                format!("{left} has {left_places} decimal places and {right} has {right_places}. Fill the shorter one with zeros."),
                format!(
                    "Write them as {} and {}, point under point, and {verb}.",
                    a.rescale(places)?,
                    b.rescale(places)?
                ),
            )
        }
        HintKind::DecConvert => Parts::new(
            "Remove the decimal point and read all the digits as one whole number.",
            format!("{left} has {left_places} decimal places and {right} has {right_places}."),
            format!(
                "Multiply {left} by {} and {right} by {} to make whole numbers.",
                power_of_ten(left_places)?,
                power_of_ten(right_places)?
            ),
        ),
        HintKind::DecMultiply => Parts::new(
            "Multiply the two whole numbers and forget about the points for now.",
            "Use long multiplication, one digit of the second number at a time.",
            format!("Work out {} × {}.", a.mantissa(), b.mantissa()),
        ),
        HintKind::DecPlacePoint => {
            let places = left_places + right_places;
            Parts::new(
                "The product has as many decimal places as both factors together.",
                format!("{left} has {left_places} and {right} has {right_places}: {places} decimal places in total."),
                format!(
                    "Take {} and count {places} digits from the right; put the point there.",
                    a.mantissa().checked_mul(b.mantissa())?
                ),
            )
        }
        HintKind::DecDivisorPlaces => {
            let worked = if right_places == 0 {
                format!("{right} has no decimal point at all.")
            } else {
                format!("In {right}, count the digits that come after the point.")
            };
            Parts::new(
                "Count the digits after the decimal point of the divisor.",
                format!("The divisor is {right}."),
                worked,
            )
        }
        HintKind::DecDivide => {
            let factor = power_of_ten(right_places)?;
            let scale = Decimal::from_integer(factor);
            Parts::new(
                "Multiply both numbers by 10 for each decimal place of the divisor, so you divide by a whole number.",
                format!("Multiply both by {factor}."),
                format!(
                    "That turns it into {} ÷ {}. Divide, and round to three decimal places if it does not end.",
                    a.checked_mul(&scale)?.normalized(),
                    b.checked_mul(&scale)?.normalized()
                ),
            )
        }
        _ => return None,
    };
    Some(parts)
}

fn percentage(kind: HintKind, percent: u64, base: u64) -> Option<Parts> {
    let parts = match kind {
        HintKind::PercFraction => Parts::new(
            "The % sign means \"out of every 100\".",
            format!("{percent}% means {percent} out of every 100."),
            format!("Write {percent} on top of the fraction line and 100 underneath."),
        ),
        HintKind::PercMultiply => {
            let tens = base / 10 * 10;
            let units = base % 10;
            let worked = if tens > 0 && units > 0 {
                format!(
                    "Split it: {percent} × {tens} = {}, then {percent} × {units} = {}. Add the two.",
                    percent.checked_mul(tens)?,
                    percent.checked_mul(units)?
                )
            } else {
                format!("Work out {base} × {percent}.")
            };
            Parts::new(
                "Of means times: multiply the amount by the percentage first.",
                format!("The amount is {base} and the percentage is {percent}."),
                worked,
            )
        }
        HintKind::PercDivide => {
            let product = percent.checked_mul(base)?;
            Parts::new(
                "Dividing by 100 moves the decimal point two places to the left.",
                format!("Start from {product}: the point is at the end, after the last digit."),
                format!("Move the point in {product} two places to the left and drop trailing zeros after the point."),
            )
        }
        _ => return None,
    };
    Some(parts)
}
