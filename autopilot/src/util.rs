use crate::controller::Gains;
use anyhow::{anyhow, Context, Result};

pub fn parse_seed(seed: &str) -> Result<u32> {
    let s = seed.trim();
    if s.is_empty() {
        return Err(anyhow!("empty seed"));
    }
    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        u32::from_str_radix(hex, 16).with_context(|| format!("invalid hex seed: {s}"))
    } else {
        s.parse::<u32>()
            .with_context(|| format!("invalid decimal seed: {s}"))
    }
}

pub fn seed_to_hex(seed: u32) -> String {
    format!("0x{seed:08x}")
}

pub fn parse_seed_csv(input: &str) -> Result<Vec<u32>> {
    let mut seeds = Vec::new();
    for token in input.split(',') {
        let token = token.trim();
        if token.is_empty() {
            continue;
        }
        seeds.push(parse_seed(token)?);
    }
    if seeds.is_empty() {
        return Err(anyhow!("no seeds parsed from --seeds"));
    }
    Ok(seeds)
}

/// Derive `count` benchmark seeds from a starting seed via an LCG walk.
pub fn seed_sequence(start: u32, count: u32) -> Vec<u32> {
    let mut out = Vec::with_capacity(count as usize);
    let mut cur = start;
    for _ in 0..count {
        out.push(cur);
        cur = cur.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
    }
    out
}

/// Parse a comma-separated list of exactly four gain values.
pub fn parse_gains_csv(input: &str) -> Result<Gains> {
    let mut values = Vec::new();
    for token in input.split(',') {
        let token = token.trim();
        if token.is_empty() {
            continue;
        }
        values.push(
            token
                .parse::<f64>()
                .with_context(|| format!("invalid gain value: {token}"))?,
        );
    }
    let values: [f64; 4] = values
        .try_into()
        .map_err(|values: Vec<f64>| anyhow!("expected 4 gains, got {}", values.len()))?;
    Ok(Gains::from_array(values))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeds_parse_in_hex_and_decimal() {
        assert_eq!(parse_seed("0xA57E0001").unwrap(), 0xA57E_0001);
        assert_eq!(parse_seed("42").unwrap(), 42);
        assert!(parse_seed("0xZZ").is_err());
        assert!(parse_seed("").is_err());
    }

    #[test]
    fn gains_csv_requires_exactly_four_values() {
        let gains = parse_gains_csv("1.0, -2.5, 3.0, 0.25").unwrap();
        assert_eq!(gains.to_array(), [1.0, -2.5, 3.0, 0.25]);
        assert!(parse_gains_csv("1.0, 2.0").is_err());
        assert!(parse_gains_csv("1,2,3,4,5").is_err());
        assert!(parse_gains_csv("1,2,three,4").is_err());
    }

    #[test]
    fn seed_sequence_starts_at_start() {
        let seeds = seed_sequence(0xA57E_0001, 4);
        assert_eq!(seeds.len(), 4);
        assert_eq!(seeds[0], 0xA57E_0001);
        assert_ne!(seeds[1], seeds[0]);
    }
}
