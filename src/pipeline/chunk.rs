//! Token partitioning for the worker pool

/// Partition tokens into worker chunks.
///
/// Three or fewer tokens fit one chunk. Larger lists are cut into windows of
/// up to three tokens advancing by two, so adjacent chunks overlap by one
/// token. The overlap is a coverage choice: it lets the combination logic
/// see neighboring tokens together.
pub fn partition(tokens: &[String]) -> Vec<Vec<String>> {
    if tokens.is_empty() {
        return Vec::new();
    }
    if tokens.len() <= 3 {
        return vec![tokens.to_vec()];
    }

    let mut chunks = Vec::new();
    let mut start = 0;
    while start < tokens.len() {
        let end = (start + 3).min(tokens.len());
        chunks.push(tokens[start..end].to_vec());
        start += 2;
    }
    chunks
}
