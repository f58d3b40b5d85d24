//! Writes `sample_sales.csv` and `sample_sales.xlsx`: a small order table with
//! duplicate rows, numeric gaps, one text column and four numeric columns, so
//! every cleaning, selection and charting path can be tried by hand.

use anyhow::{Context, Result};
use rust_xlsxwriter::{Format, Workbook};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
struct OrderRow {
    order_id: u32,
    region: &'static str,
    units: Option<u32>,
    unit_price: f64,
    revenue: Option<f64>,
}

/// Minimal deterministic PRNG (xorshift64*)
struct SimpleRng(u64);

impl SimpleRng {
    fn new(seed: u64) -> Self {
        SimpleRng(seed.wrapping_mul(6364136223846793005).wrapping_add(1))
    }

    fn next_u64(&mut self) -> u64 {
        self.0 ^= self.0 >> 12;
        self.0 ^= self.0 << 25;
        self.0 ^= self.0 >> 27;
        self.0.wrapping_mul(0x2545_F491_4F6C_DD1D)
    }

    fn below(&mut self, n: u64) -> u64 {
        self.next_u64() % n
    }
}

fn generate_rows(rng: &mut SimpleRng) -> Vec<OrderRow> {
    let regions = ["North", "South", "East", "West"];
    let mut rows = Vec::new();

    for order_id in 1..=40u32 {
        let units = 1 + rng.below(20) as u32;
        let unit_price = (500 + rng.below(4500)) as f64 / 100.0;
        let mut row = OrderRow {
            order_id,
            region: regions[rng.below(regions.len() as u64) as usize],
            units: Some(units),
            unit_price,
            revenue: Some((units as f64 * unit_price * 100.0).round() / 100.0),
        };

        // Roughly one row in six loses a value.
        match rng.below(12) {
            0 => row.units = None,
            1 => row.revenue = None,
            _ => {}
        }

        // And roughly one in eight is entered twice.
        let duplicate = rng.below(8) == 0;
        rows.push(row.clone());
        if duplicate {
            rows.push(row);
        }
    }
    rows
}

fn write_csv(rows: &[OrderRow], path: &str) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).with_context(|| format!("creating {path}"))?;
    for row in rows {
        writer.serialize(row).context("writing CSV row")?;
    }
    writer.flush().context("flushing CSV")?;
    Ok(())
}

fn write_xlsx(rows: &[OrderRow], path: &str) -> Result<()> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name("Sheet1")?;

    let bold = Format::new().set_bold();
    let headers = ["order_id", "region", "units", "unit_price", "revenue"];
    for (col, header) in headers.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *header, &bold)?;
    }

    for (i, row) in rows.iter().enumerate() {
        let r = i as u32 + 1;
        sheet.write_number(r, 0, row.order_id)?;
        sheet.write_string(r, 1, row.region)?;
        if let Some(units) = row.units {
            sheet.write_number(r, 2, units)?;
        }
        sheet.write_number(r, 3, row.unit_price)?;
        if let Some(revenue) = row.revenue {
            sheet.write_number(r, 4, revenue)?;
        }
    }

    workbook
        .save(path)
        .with_context(|| format!("saving {path}"))?;
    Ok(())
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let rows = generate_rows(&mut rng);

    write_csv(&rows, "sample_sales.csv")?;
    write_xlsx(&rows, "sample_sales.xlsx")?;

    println!(
        "Wrote {} rows ({} orders) to sample_sales.csv and sample_sales.xlsx",
        rows.len(),
        rows.last().map_or(0, |r| r.order_id)
    );
    Ok(())
}
