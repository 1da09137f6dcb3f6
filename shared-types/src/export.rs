use thiserror::Error;

use crate::pool::Pool;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("csv write failed: {0}")]
    Csv(#[from] csv::Error),
    #[error("csv buffer flush failed: {0}")]
    Flush(String),
    #[error("csv output is not utf-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
}

pub const CSV_HEADERS: [&str; 5] = ["ID", "Commercial Name", "District", "Rating", "State"];

/// Renders the pool table as CSV. Unrated pools get an empty rating cell.
pub fn pools_to_csv(pools: &[Pool]) -> Result<String, ExportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(CSV_HEADERS)?;

    for pool in pools {
        writer.write_record([
            pool.id.to_string(),
            pool.commercial_name.clone().unwrap_or_default(),
            pool.district.clone(),
            pool.rating.map(|rating| rating.to_string()).unwrap_or_default(),
            pool.current_state.as_str().to_string(),
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|err| ExportError::Flush(err.to_string()))?;
    Ok(String::from_utf8(bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{sample_pool, HealthState};

    #[test]
    fn writes_header_and_rows() {
        let mut second = sample_pool(2);
        second.commercial_name = Some("Club, Norte".to_string());
        second.rating = None;
        second.current_state = HealthState::Unhealthy;

        let csv = pools_to_csv(&[sample_pool(1), second]).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines[0], "ID,Commercial Name,District,Rating,State");
        assert_eq!(lines[1], "1,Pool 1,Cayma,4,HEALTHY");
        assert_eq!(lines[2], "2,\"Club, Norte\",Cayma,,UNHEALTHY");
    }
}
