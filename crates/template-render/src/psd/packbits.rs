//! PackBits run-length encoding for raster rows

/// Longest run or literal a single header byte can describe
const MAX_CHUNK: usize = 128;

/// Encode one row, appending to `out`
pub(crate) fn encode_row(row: &[u8], out: &mut Vec<u8>) {
    let n = row.len();
    let mut i = 0;
    while i < n {
        let mut run = 1;
        while i + run < n && run < MAX_CHUNK && row[i + run] == row[i] {
            run += 1;
        }

        if run >= 2 {
            out.push((1 - run as i16) as i8 as u8);
            out.push(row[i]);
            i += run;
            continue;
        }

        // Literal stretch, ended by a run of three or the chunk limit
        let start = i;
        i += 1;
        while i < n && i - start < MAX_CHUNK {
            if i + 2 < n && row[i] == row[i + 1] && row[i] == row[i + 2] {
                break;
            }
            i += 1;
        }
        out.push((i - start - 1) as u8);
        out.extend_from_slice(&row[start..i]);
    }
}

#[cfg(test)]
fn decode(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    let mut i = 0;
    while i < data.len() {
        let header = data[i] as i8;
        i += 1;
        if header >= 0 {
            let len = header as usize + 1;
            out.extend_from_slice(&data[i..i + len]);
            i += len;
        } else if header != -128 {
            let len = (1 - header as i16) as usize;
            out.extend(std::iter::repeat_n(data[i], len));
            i += 1;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn round_trip(row: &[u8]) -> Vec<u8> {
        let mut packed = Vec::new();
        encode_row(row, &mut packed);
        decode(&packed)
    }

    #[test]
    fn solid_rows_collapse() {
        let row = vec![7u8; 3000];
        let mut packed = Vec::new();
        encode_row(&row, &mut packed);
        // 3000 bytes in runs of 128 need 24 two-byte chunks
        assert_eq!(packed.len(), 48);
        assert_eq!(decode(&packed), row);
    }

    #[test]
    fn mixed_rows_survive() {
        let mut row: Vec<u8> = (0..=255).collect();
        row.extend([9, 9, 9, 9, 1, 2, 2, 3]);
        row.extend(vec![0u8; 300]);
        assert_eq!(round_trip(&row), row);
        assert_eq!(round_trip(&[5]), vec![5]);
        assert_eq!(round_trip(&[]), Vec::<u8>::new());
    }
}
