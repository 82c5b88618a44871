//! Prompt templates for statement extraction

use crate::statement::SectionKind;

/// Templates for the prompts sent to extraction agents
pub struct AuditPromptTemplate;

impl AuditPromptTemplate {
    /// System prompt shared by every agent
    pub fn system() -> &'static str {
        r#"You are a financial statement auditor verifying footing: that every reported total equals the sum of its components.
Read numbers exactly as printed. Recompute every total from its components yourself.
Respond with a single JSON object and nothing else."#
    }

    /// Extraction prompt for one statement document.
    ///
    /// `approach` is the agent's verification emphasis from its profile.
    pub fn extraction_prompt(section: SectionKind, statement_text: &str, approach: &str) -> String {
        format!(
            r#"TASK: Audit the {name} for mathematical accuracy and footing verification.

CALCULATION REQUIREMENTS:
1. Verify all addition/subtraction operations
2. Check that totals equal the sum of their components
3. Validate the balance sheet equation (Assets = Liabilities + Equity) where applicable
4. Identify any discrepancies

OUTPUT FORMAT: Return valid JSON with this structure:
{schema}

Use plain numbers without thousands separators. Write negative amounts with a minus sign.

FINANCIAL STATEMENT:
{statement_text}

AGENT SPECIALIZATION: {approach}

Return ONLY the JSON structure above. No additional text."#,
            name = section.display_name(),
            schema = Self::schema(section),
            statement_text = statement_text,
            approach = approach,
        )
    }

    /// Expected JSON shape for a section
    pub fn schema(section: SectionKind) -> String {
        let balancing = if section == SectionKind::BalanceSheet {
            r#",
    "balancing": {
      "total_aset": <assets_total>,
      "total_liabilitas_ekuitas": <liabilities_and_equity_total>,
      "selisih": <difference>,
      "status": "Seimbang|Tidak Seimbang"
    }"#
        } else {
            ""
        };

        format!(
            r#"{{
  "{key}": {{
    "<group>": {{
      "<line_item>": {{
        "nama_akun": "<account name as printed>",
        "nilai_tercatat": <reported_value>,
        "nilai_perhitungan": <calculated_value>,
        "selisih": <calculated_value - reported_value>,
        "status": "OK|MISMATCH",
        "detail_perhitungan": [
          {{"akun": "<component>", "nilai": <value>}}
        ]
      }}
    }}{balancing}
  }}
}}"#,
            key = section.payload_key(),
            balancing = balancing,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extraction_prompt_embeds_inputs() {
        let prompt = AuditPromptTemplate::extraction_prompt(
            SectionKind::IncomeStatement,
            "Pendapatan 1.000",
            "Emphasize cross-checking totals against component sums.",
        );
        assert!(prompt.contains("Income Statement"));
        assert!(prompt.contains("\"laporan_laba_rugi\""));
        assert!(prompt.contains("Pendapatan 1.000"));
        assert!(prompt.contains("AGENT SPECIALIZATION: Emphasize cross-checking"));
        assert!(!prompt.contains("balancing"));
    }

    #[test]
    fn test_balance_sheet_schema_has_balancing() {
        let schema = AuditPromptTemplate::schema(SectionKind::BalanceSheet);
        assert!(schema.contains("\"balancing\""));
        assert!(schema.contains("Seimbang|Tidak Seimbang"));
    }
}
