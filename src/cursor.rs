use crate::error::{DecodeError, DecodeResult};

/// 境界チェック付きの前方専用リーダー。整数はすべてビッグエンディアンで読む。
#[derive(Debug, Clone)]
pub struct ByteCursor<'a> {
    data: &'a [u8],
    position: usize,
}

impl<'a> ByteCursor<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, position: 0 }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.position
    }

    pub fn rest(&self) -> &'a [u8] {
        &self.data[self.position..]
    }

    fn take(&mut self, n: usize) -> DecodeResult<&'a [u8]> {
        if n > self.remaining() {
            return Err(DecodeError::Truncated {
                needed: n,
                remaining: self.remaining(),
            });
        }

        let span = &self.data[self.position..self.position + n];
        self.position += n;
        Ok(span)
    }

    /// 1/2/3/4/8 バイトの符号なし整数を読む
    pub fn read_uint(&mut self, width: usize) -> DecodeResult<u64> {
        debug_assert!(matches!(width, 1 | 2 | 3 | 4 | 8), "unsupported width {}", width);

        let bytes = self.take(width)?;
        Ok(bytes.iter().fold(0u64, |acc, &b| (acc << 8) | b as u64))
    }

    pub fn read_u8(&mut self) -> DecodeResult<u8> {
        Ok(self.take(1)?[0])
    }

    pub fn read_u16(&mut self) -> DecodeResult<u16> {
        Ok(u16::from_be_bytes(self.read_bytes::<2>()?))
    }

    pub fn read_u24(&mut self) -> DecodeResult<u32> {
        let [hi, mid, lo] = self.read_bytes::<3>()?;
        Ok(u32::from_be_bytes([0, hi, mid, lo]))
    }

    pub fn read_u32(&mut self) -> DecodeResult<u32> {
        Ok(u32::from_be_bytes(self.read_bytes::<4>()?))
    }

    pub fn read_u64(&mut self) -> DecodeResult<u64> {
        Ok(u64::from_be_bytes(self.read_bytes::<8>()?))
    }

    pub fn read_bytes<const N: usize>(&mut self) -> DecodeResult<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }

    pub fn read_slice(&mut self, n: usize) -> DecodeResult<&'a [u8]> {
        self.take(n)
    }

    pub fn skip(&mut self, n: usize) -> DecodeResult<()> {
        self.take(n).map(|_| ())
    }
}

/// カウンターレコードのフィールド幅 (4 または 8 バイト)
pub trait BigEndianField: Sized {
    fn read(cursor: &mut ByteCursor<'_>) -> DecodeResult<Self>;
}

impl BigEndianField for u32 {
    fn read(cursor: &mut ByteCursor<'_>) -> DecodeResult<Self> {
        cursor.read_u32()
    }
}

impl BigEndianField for u64 {
    fn read(cursor: &mut ByteCursor<'_>) -> DecodeResult<Self> {
        cursor.read_u64()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_uint_widths() {
        let data = [0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0a, 0x0b, 0x0c, 0x0d, 0x0e, 0x0f, 0x10, 0x11, 0x12];
        let mut cursor = ByteCursor::new(&data);

        assert_eq!(cursor.read_uint(1).unwrap(), 0x01);
        assert_eq!(cursor.read_uint(2).unwrap(), 0x0203);
        assert_eq!(cursor.read_uint(3).unwrap(), 0x040506);
        assert_eq!(cursor.read_uint(4).unwrap(), 0x0708090a);
        assert_eq!(cursor.read_uint(8).unwrap(), 0x0b0c0d0e0f101112);
        assert_eq!(cursor.remaining(), 0);
    }

    #[test]
    fn test_read_u24() {
        let mut cursor = ByteCursor::new(&[0xab, 0xcd, 0xef]);
        assert_eq!(cursor.read_u24().unwrap(), 0x00ab_cdef);
    }

    #[test]
    fn test_truncated_read_does_not_advance() {
        let mut cursor = ByteCursor::new(&[0x00, 0x01, 0x02]);

        assert_eq!(
            cursor.read_u32(),
            Err(DecodeError::Truncated { needed: 4, remaining: 3 })
        );
        assert_eq!(cursor.position(), 0);
        assert_eq!(cursor.read_u16().unwrap(), 0x0001);
    }

    #[test]
    fn test_skip() {
        let data = [0u8; 10];
        let mut cursor = ByteCursor::new(&data);

        cursor.skip(6).unwrap();
        assert_eq!(cursor.position(), 6);
        assert_eq!(cursor.rest().len(), 4);
        assert_eq!(
            cursor.skip(5),
            Err(DecodeError::Truncated { needed: 5, remaining: 4 })
        );
        cursor.skip(4).unwrap();
        assert_eq!(cursor.remaining(), 0);
    }

    #[test]
    fn test_read_bytes_and_slice() {
        let data = [1, 2, 3, 4, 5, 6, 7];
        let mut cursor = ByteCursor::new(&data);

        assert_eq!(cursor.read_bytes::<3>().unwrap(), [1, 2, 3]);
        assert_eq!(cursor.read_slice(2).unwrap(), &[4, 5]);
        assert!(cursor.read_bytes::<3>().is_err());
    }
}
