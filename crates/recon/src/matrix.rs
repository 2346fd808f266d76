use crate::model::{Frame, Matrix, Orientation};
use crate::normalize::{normalize, normalize_cell};

/// Build the normalized entity × attribute lookup for one frame.
///
/// Entity and attribute keys are normalized; empty keys are never inserted.
/// Stored values are trimmed but keep their case (comparison normalizes them).
pub fn build_matrix(frame: &Frame, orientation: Orientation) -> Matrix {
    let mut matrix = Matrix::default();
    if frame.header.is_empty() {
        return matrix;
    }

    match orientation {
        Orientation::Rows => {
            let attributes: Vec<String> = frame.header.iter().skip(1).map(|h| normalize(h)).collect();

            for row in 0..frame.rows.len() {
                let entity = normalize_cell(frame.cell(row, 0));
                if entity.is_empty() {
                    continue;
                }
                matrix.entities.insert(entity.clone());
                let values = matrix.values.entry(entity).or_default();

                for (offset, attribute) in attributes.iter().enumerate() {
                    if attribute.is_empty() {
                        continue;
                    }
                    matrix.attributes.insert(attribute.clone());
                    let value = frame.cell(row, offset + 1).to_trimmed_string();
                    values.insert(attribute.clone(), value);
                }
            }
        }
        Orientation::Columns => {
            let entities: Vec<String> = frame.header.iter().skip(1).map(|h| normalize(h)).collect();

            for row in 0..frame.rows.len() {
                let attribute = normalize_cell(frame.cell(row, 0));
                if attribute.is_empty() {
                    continue;
                }
                matrix.attributes.insert(attribute.clone());

                for (offset, entity) in entities.iter().enumerate() {
                    if entity.is_empty() {
                        continue;
                    }
                    matrix.entities.insert(entity.clone());
                    let value = frame.cell(row, offset + 1).to_trimmed_string();
                    matrix
                        .values
                        .entry(entity.clone())
                        .or_default()
                        .insert(attribute.clone(), value);
                }
            }
        }
    }

    log::debug!(
        "matrix ({orientation}): {} entities x {} attributes",
        matrix.entities.len(),
        matrix.attributes.len()
    );

    matrix
}
