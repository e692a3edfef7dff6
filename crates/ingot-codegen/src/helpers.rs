//! The helper-function block emitted alongside transformed code.
//!
//! Every helper is verbatim Go source registered with the imports it needs
//! and the other helpers it calls. Selection closes transitively over those
//! dependencies, and emission walks the registry in definition order, so the
//! output is stable across runs. The public function names are contracts:
//! lowered code references them by name.

use indexmap::IndexSet;

pub struct HelperDef {
    pub name: &'static str,
    pub deps: &'static [&'static str],
    pub imports: &'static [&'static str],
    pub source: &'static str,
}

macro_rules! helper {
    ($name:literal, $source:literal) => {
        HelperDef {
            name: $name,
            deps: &[],
            imports: &[],
            source: $source,
        }
    };
    ($name:literal, deps = [$($dep:literal),*], $source:literal) => {
        HelperDef {
            name: $name,
            deps: &[$($dep),*],
            imports: &[],
            source: $source,
        }
    };
    ($name:literal, imports = [$($import:literal),*], $source:literal) => {
        HelperDef {
            name: $name,
            deps: &[],
            imports: &[$($import),*],
            source: $source,
        }
    };
    ($name:literal, deps = [$($dep:literal),*], imports = [$($import:literal),*], $source:literal) => {
        HelperDef {
            name: $name,
            deps: &[$($dep),*],
            imports: &[$($import),*],
            source: $source,
        }
    };
}

/// The registry, in emission order.
pub const HELPERS: &[HelperDef] = &[
    // Hex decoding
    helper!(
        "hexVal",
        r#"func hexVal(c byte) int {
	switch {
	case c >= '0' && c <= '9':
		return int(c - '0')
	case c >= 'a' && c <= 'f':
		return int(c-'a') + 10
	case c >= 'A' && c <= 'F':
		return int(c-'A') + 10
	}
	return -1
}"#
    ),
    helper!(
        "mustHexDecode",
        imports = ["encoding/hex"],
        r#"func mustHexDecode(s string) []uint8 {
	b, err := hex.DecodeString(s)
	if err != nil {
		panic(err)
	}
	return b
}"#
    ),
    // Min/max per integer width
    helper!(
        "minInt",
        r#"func minInt(a, b int) int {
	if a < b {
		return a
	}
	return b
}"#
    ),
    helper!(
        "maxInt",
        r#"func maxInt(a, b int) int {
	if a > b {
		return a
	}
	return b
}"#
    ),
    helper!(
        "minInt8",
        r#"func minInt8(a, b int8) int8 {
	if a < b {
		return a
	}
	return b
}"#
    ),
    helper!(
        "maxInt8",
        r#"func maxInt8(a, b int8) int8 {
	if a > b {
		return a
	}
	return b
}"#
    ),
    helper!(
        "minInt16",
        r#"func minInt16(a, b int16) int16 {
	if a < b {
		return a
	}
	return b
}"#
    ),
    helper!(
        "maxInt16",
        r#"func maxInt16(a, b int16) int16 {
	if a > b {
		return a
	}
	return b
}"#
    ),
    helper!(
        "minInt32",
        r#"func minInt32(a, b int32) int32 {
	if a < b {
		return a
	}
	return b
}"#
    ),
    helper!(
        "maxInt32",
        r#"func maxInt32(a, b int32) int32 {
	if a > b {
		return a
	}
	return b
}"#
    ),
    helper!(
        "minUint",
        r#"func minUint(a, b uint) uint {
	if a < b {
		return a
	}
	return b
}"#
    ),
    helper!(
        "maxUint",
        r#"func maxUint(a, b uint) uint {
	if a > b {
		return a
	}
	return b
}"#
    ),
    helper!(
        "minUint8",
        r#"func minUint8(a, b uint8) uint8 {
	if a < b {
		return a
	}
	return b
}"#
    ),
    helper!(
        "maxUint8",
        r#"func maxUint8(a, b uint8) uint8 {
	if a > b {
		return a
	}
	return b
}"#
    ),
    helper!(
        "minUint16",
        r#"func minUint16(a, b uint16) uint16 {
	if a < b {
		return a
	}
	return b
}"#
    ),
    helper!(
        "maxUint16",
        r#"func maxUint16(a, b uint16) uint16 {
	if a > b {
		return a
	}
	return b
}"#
    ),
    helper!(
        "minUint32",
        r#"func minUint32(a, b uint32) uint32 {
	if a < b {
		return a
	}
	return b
}"#
    ),
    helper!(
        "maxUint32",
        r#"func maxUint32(a, b uint32) uint32 {
	if a > b {
		return a
	}
	return b
}"#
    ),
    helper!(
        "minUint64",
        r#"func minUint64(a, b uint64) uint64 {
	if a < b {
		return a
	}
	return b
}"#
    ),
    helper!(
        "maxUint64",
        r#"func maxUint64(a, b uint64) uint64 {
	if a > b {
		return a
	}
	return b
}"#
    ),
    helper!(
        "minInt64",
        r#"func minInt64(a, b int64) int64 {
	if a < b {
		return a
	}
	return b
}"#
    ),
    helper!(
        "maxInt64",
        r#"func maxInt64(a, b int64) int64 {
	if a > b {
		return a
	}
	return b
}"#
    ),
    // Numeric coercion used by the generic slice helpers
    helper!(
        "asUint64",
        r#"func asUint64(v interface{}) (uint64, bool) {
	switch n := v.(type) {
	case int:
		return uint64(n), true
	case int8:
		return uint64(n), true
	case int16:
		return uint64(n), true
	case int32:
		return uint64(n), true
	case int64:
		return uint64(n), true
	case uint:
		return uint64(n), true
	case uint8:
		return uint64(n), true
	case uint16:
		return uint64(n), true
	case uint32:
		return uint64(n), true
	case uint64:
		return n, true
	case float32:
		return uint64(n), true
	case float64:
		return uint64(n), true
	}
	return 0, false
}"#
    ),
    // Contains / indexOf
    helper!(
        "indexOfBytes",
        r#"func indexOfBytes(xs []uint8, v uint8) int {
	for i, x := range xs {
		if x == v {
			return i
		}
	}
	return -1
}"#
    ),
    helper!(
        "indexOfUint32",
        r#"func indexOfUint32(xs []uint32, v uint32) int {
	for i, x := range xs {
		if x == v {
			return i
		}
	}
	return -1
}"#
    ),
    helper!(
        "indexOfString",
        r#"func indexOfString(xs []string, v string) int {
	for i, x := range xs {
		if x == v {
			return i
		}
	}
	return -1
}"#
    ),
    helper!(
        "indexOfSlice",
        deps = ["asUint64", "indexOfBytes", "indexOfUint32", "indexOfString"],
        r#"func indexOfSlice(xs interface{}, v interface{}) int {
	switch s := xs.(type) {
	case []uint8:
		if n, ok := asUint64(v); ok {
			return indexOfBytes(s, uint8(n))
		}
	case []uint32:
		if n, ok := asUint64(v); ok {
			return indexOfUint32(s, uint32(n))
		}
	case []string:
		if str, ok := v.(string); ok {
			return indexOfString(s, str)
		}
	case []interface{}:
		for i, x := range s {
			if x == v {
				return i
			}
		}
	}
	return -1
}"#
    ),
    helper!(
        "containsSlice",
        deps = ["indexOfSlice"],
        r#"func containsSlice(xs interface{}, v interface{}) bool {
	return indexOfSlice(xs, v) >= 0
}"#
    ),
    // Reverse / sort / clone / copy
    helper!(
        "reverseBytes",
        r#"func reverseBytes(xs []uint8) []uint8 {
	out := make([]uint8, len(xs))
	for i, x := range xs {
		out[len(xs)-1-i] = x
	}
	return out
}"#
    ),
    helper!(
        "reverseUint32s",
        r#"func reverseUint32s(xs []uint32) []uint32 {
	out := make([]uint32, len(xs))
	for i, x := range xs {
		out[len(xs)-1-i] = x
	}
	return out
}"#
    ),
    helper!(
        "reverseSlice",
        r#"func reverseSlice(xs []interface{}) []interface{} {
	out := make([]interface{}, len(xs))
	for i, x := range xs {
		out[len(xs)-1-i] = x
	}
	return out
}"#
    ),
    helper!(
        "sortBytes",
        imports = ["sort"],
        r#"func sortBytes(xs []uint8) []uint8 {
	out := append([]uint8{}, xs...)
	sort.Slice(out, func(i, j int) bool { return out[i] < out[j] })
	return out
}"#
    ),
    helper!(
        "sortStrings",
        imports = ["sort"],
        r#"func sortStrings(xs []string) []string {
	out := append([]string{}, xs...)
	sort.Strings(out)
	return out
}"#
    ),
    helper!(
        "cloneBytes",
        r#"func cloneBytes(xs []uint8) []uint8 {
	return append([]uint8{}, xs...)
}"#
    ),
    helper!(
        "cloneUint32s",
        r#"func cloneUint32s(xs []uint32) []uint32 {
	return append([]uint32{}, xs...)
}"#
    ),
    helper!(
        "cloneSlice",
        r#"func cloneSlice(xs []interface{}) []interface{} {
	return append([]interface{}{}, xs...)
}"#
    ),
    helper!(
        "copyBytes",
        r#"func copyBytes(dst, src []uint8) int {
	return copy(dst, src)
}"#
    ),
    helper!(
        "copyUint32s",
        r#"func copyUint32s(dst, src []uint32) int {
	return copy(dst, src)
}"#
    ),
    // Byte/word/dword/qword packing from scalars
    helper!(
        "pack16BE",
        r#"func pack16BE(b0, b1 uint8) uint16 {
	return uint16(b0)<<8 | uint16(b1)
}"#
    ),
    helper!(
        "pack16LE",
        r#"func pack16LE(b0, b1 uint8) uint16 {
	return uint16(b0) | uint16(b1)<<8
}"#
    ),
    helper!(
        "pack32BE",
        r#"func pack32BE(b0, b1, b2, b3 uint8) uint32 {
	return uint32(b0)<<24 | uint32(b1)<<16 | uint32(b2)<<8 | uint32(b3)
}"#
    ),
    helper!(
        "pack32LE",
        r#"func pack32LE(b0, b1, b2, b3 uint8) uint32 {
	return uint32(b0) | uint32(b1)<<8 | uint32(b2)<<16 | uint32(b3)<<24
}"#
    ),
    helper!(
        "pack64BE",
        deps = ["pack32BE"],
        r#"func pack64BE(b0, b1, b2, b3, b4, b5, b6, b7 uint8) uint64 {
	return uint64(pack32BE(b0, b1, b2, b3))<<32 | uint64(pack32BE(b4, b5, b6, b7))
}"#
    ),
    helper!(
        "pack64LE",
        deps = ["pack32LE"],
        r#"func pack64LE(b0, b1, b2, b3, b4, b5, b6, b7 uint8) uint64 {
	return uint64(pack32LE(b0, b1, b2, b3)) | uint64(pack32LE(b4, b5, b6, b7))<<32
}"#
    ),
    // Packing from slices
    helper!(
        "pack16BESlice",
        imports = ["encoding/binary"],
        r#"func pack16BESlice(bs []uint8) uint16 {
	return binary.BigEndian.Uint16(bs)
}"#
    ),
    helper!(
        "pack16LESlice",
        imports = ["encoding/binary"],
        r#"func pack16LESlice(bs []uint8) uint16 {
	return binary.LittleEndian.Uint16(bs)
}"#
    ),
    helper!(
        "pack32BESlice",
        imports = ["encoding/binary"],
        r#"func pack32BESlice(bs []uint8) uint32 {
	return binary.BigEndian.Uint32(bs)
}"#
    ),
    helper!(
        "pack32LESlice",
        imports = ["encoding/binary"],
        r#"func pack32LESlice(bs []uint8) uint32 {
	return binary.LittleEndian.Uint32(bs)
}"#
    ),
    helper!(
        "pack64BESlice",
        imports = ["encoding/binary"],
        r#"func pack64BESlice(bs []uint8) uint64 {
	return binary.BigEndian.Uint64(bs)
}"#
    ),
    helper!(
        "pack64LESlice",
        imports = ["encoding/binary"],
        r#"func pack64LESlice(bs []uint8) uint64 {
	return binary.LittleEndian.Uint64(bs)
}"#
    ),
    // Unpacking to byte slices
    helper!(
        "unpack16BE",
        r#"func unpack16BE(v uint16) []uint8 {
	return []uint8{uint8(v >> 8), uint8(v)}
}"#
    ),
    helper!(
        "unpack16LE",
        r#"func unpack16LE(v uint16) []uint8 {
	return []uint8{uint8(v), uint8(v >> 8)}
}"#
    ),
    helper!(
        "unpack32BE",
        r#"func unpack32BE(v uint32) []uint8 {
	return []uint8{uint8(v >> 24), uint8(v >> 16), uint8(v >> 8), uint8(v)}
}"#
    ),
    helper!(
        "unpack32LE",
        r#"func unpack32LE(v uint32) []uint8 {
	return []uint8{uint8(v), uint8(v >> 8), uint8(v >> 16), uint8(v >> 24)}
}"#
    ),
    helper!(
        "unpack64BE",
        imports = ["encoding/binary"],
        r#"func unpack64BE(v uint64) []uint8 {
	out := make([]uint8, 8)
	binary.BigEndian.PutUint64(out, v)
	return out
}"#
    ),
    helper!(
        "unpack64LE",
        imports = ["encoding/binary"],
        r#"func unpack64LE(v uint64) []uint8 {
	out := make([]uint8, 8)
	binary.LittleEndian.PutUint64(out, v)
	return out
}"#
    ),
    // Rotates
    helper!(
        "rotl8",
        imports = ["math/bits"],
        r#"func rotl8(v uint8, n int) uint8 {
	return bits.RotateLeft8(v, n)
}"#
    ),
    helper!(
        "rotr8",
        imports = ["math/bits"],
        r#"func rotr8(v uint8, n int) uint8 {
	return bits.RotateLeft8(v, -n)
}"#
    ),
    helper!(
        "rotl16",
        imports = ["math/bits"],
        r#"func rotl16(v uint16, n int) uint16 {
	return bits.RotateLeft16(v, n)
}"#
    ),
    helper!(
        "rotr16",
        imports = ["math/bits"],
        r#"func rotr16(v uint16, n int) uint16 {
	return bits.RotateLeft16(v, -n)
}"#
    ),
    helper!(
        "rotl32",
        imports = ["math/bits"],
        r#"func rotl32(v uint32, n int) uint32 {
	return bits.RotateLeft32(v, n)
}"#
    ),
    helper!(
        "rotr32",
        imports = ["math/bits"],
        r#"func rotr32(v uint32, n int) uint32 {
	return bits.RotateLeft32(v, -n)
}"#
    ),
    helper!(
        "rotl64",
        imports = ["math/bits"],
        r#"func rotl64(v uint64, n int) uint64 {
	return bits.RotateLeft64(v, n)
}"#
    ),
    helper!(
        "rotr64",
        imports = ["math/bits"],
        r#"func rotr64(v uint64, n int) uint64 {
	return bits.RotateLeft64(v, -n)
}"#
    ),
    // Pre/post increment and decrement, per integer width
    helper!(
        "preIncrInt",
        r#"func preIncrInt(p *int) int {
	*p++
	return *p
}"#
    ),
    helper!(
        "postIncrInt",
        r#"func postIncrInt(p *int) int {
	v := *p
	*p++
	return v
}"#
    ),
    helper!(
        "preDecrInt",
        r#"func preDecrInt(p *int) int {
	*p--
	return *p
}"#
    ),
    helper!(
        "postDecrInt",
        r#"func postDecrInt(p *int) int {
	v := *p
	*p--
	return v
}"#
    ),
    helper!(
        "preIncrUint8",
        r#"func preIncrUint8(p *uint8) uint8 {
	*p++
	return *p
}"#
    ),
    helper!(
        "postIncrUint8",
        r#"func postIncrUint8(p *uint8) uint8 {
	v := *p
	*p++
	return v
}"#
    ),
    helper!(
        "preDecrUint8",
        r#"func preDecrUint8(p *uint8) uint8 {
	*p--
	return *p
}"#
    ),
    helper!(
        "postDecrUint8",
        r#"func postDecrUint8(p *uint8) uint8 {
	v := *p
	*p--
	return v
}"#
    ),
    helper!(
        "preIncrUint16",
        r#"func preIncrUint16(p *uint16) uint16 {
	*p++
	return *p
}"#
    ),
    helper!(
        "postIncrUint16",
        r#"func postIncrUint16(p *uint16) uint16 {
	v := *p
	*p++
	return v
}"#
    ),
    helper!(
        "preDecrUint16",
        r#"func preDecrUint16(p *uint16) uint16 {
	*p--
	return *p
}"#
    ),
    helper!(
        "postDecrUint16",
        r#"func postDecrUint16(p *uint16) uint16 {
	v := *p
	*p--
	return v
}"#
    ),
    helper!(
        "preIncrUint32",
        r#"func preIncrUint32(p *uint32) uint32 {
	*p++
	return *p
}"#
    ),
    helper!(
        "postIncrUint32",
        r#"func postIncrUint32(p *uint32) uint32 {
	v := *p
	*p++
	return v
}"#
    ),
    helper!(
        "preDecrUint32",
        r#"func preDecrUint32(p *uint32) uint32 {
	*p--
	return *p
}"#
    ),
    helper!(
        "postDecrUint32",
        r#"func postDecrUint32(p *uint32) uint32 {
	v := *p
	*p--
	return v
}"#
    ),
    helper!(
        "preIncrUint64",
        r#"func preIncrUint64(p *uint64) uint64 {
	*p++
	return *p
}"#
    ),
    helper!(
        "postIncrUint64",
        r#"func postIncrUint64(p *uint64) uint64 {
	v := *p
	*p++
	return v
}"#
    ),
    helper!(
        "preDecrUint64",
        r#"func preDecrUint64(p *uint64) uint64 {
	*p--
	return *p
}"#
    ),
    helper!(
        "postDecrUint64",
        r#"func postDecrUint64(p *uint64) uint64 {
	v := *p
	*p--
	return v
}"#
    ),
    // Typed array combinators: generic versions over interface{} plus the
    // byte/uint32 variants chosen when the element type is statically known.
    helper!(
        "mapSlice",
        r#"func mapSlice(xs []interface{}, f func(interface{}, int) interface{}) []interface{} {
	out := make([]interface{}, len(xs))
	for i, x := range xs {
		out[i] = f(x, i)
	}
	return out
}"#
    ),
    helper!(
        "mapSliceBytes",
        r#"func mapSliceBytes(xs []uint8, f func(uint8, int) uint8) []uint8 {
	out := make([]uint8, len(xs))
	for i, x := range xs {
		out[i] = f(x, i)
	}
	return out
}"#
    ),
    helper!(
        "mapSliceUint32",
        r#"func mapSliceUint32(xs []uint32, f func(uint32, int) uint32) []uint32 {
	out := make([]uint32, len(xs))
	for i, x := range xs {
		out[i] = f(x, i)
	}
	return out
}"#
    ),
    helper!(
        "filterSlice",
        r#"func filterSlice(xs []interface{}, f func(interface{}, int) bool) []interface{} {
	out := []interface{}{}
	for i, x := range xs {
		if f(x, i) {
			out = append(out, x)
		}
	}
	return out
}"#
    ),
    helper!(
        "filterSliceBytes",
        r#"func filterSliceBytes(xs []uint8, f func(uint8, int) bool) []uint8 {
	out := []uint8{}
	for i, x := range xs {
		if f(x, i) {
			out = append(out, x)
		}
	}
	return out
}"#
    ),
    helper!(
        "filterSliceUint32",
        r#"func filterSliceUint32(xs []uint32, f func(uint32, int) bool) []uint32 {
	out := []uint32{}
	for i, x := range xs {
		if f(x, i) {
			out = append(out, x)
		}
	}
	return out
}"#
    ),
    helper!(
        "reduceSlice",
        r#"func reduceSlice(xs []interface{}, f func(interface{}, interface{}, int) interface{}, init interface{}) interface{} {
	acc := init
	for i, x := range xs {
		acc = f(acc, x, i)
	}
	return acc
}"#
    ),
    helper!(
        "reduceSliceBytes",
        r#"func reduceSliceBytes(xs []uint8, f func(interface{}, uint8, int) interface{}, init interface{}) interface{} {
	acc := init
	for i, x := range xs {
		acc = f(acc, x, i)
	}
	return acc
}"#
    ),
    helper!(
        "reduceSliceUint32",
        r#"func reduceSliceUint32(xs []uint32, f func(interface{}, uint32, int) interface{}, init interface{}) interface{} {
	acc := init
	for i, x := range xs {
		acc = f(acc, x, i)
	}
	return acc
}"#
    ),
    helper!(
        "findSlice",
        r#"func findSlice(xs []interface{}, f func(interface{}, int) bool) interface{} {
	for i, x := range xs {
		if f(x, i) {
			return x
		}
	}
	return nil
}"#
    ),
    helper!(
        "findSliceBytes",
        r#"func findSliceBytes(xs []uint8, f func(uint8, int) bool) interface{} {
	for i, x := range xs {
		if f(x, i) {
			return x
		}
	}
	return nil
}"#
    ),
    helper!(
        "findIndexSlice",
        r#"func findIndexSlice(xs []interface{}, f func(interface{}, int) bool) int {
	for i, x := range xs {
		if f(x, i) {
			return i
		}
	}
	return -1
}"#
    ),
    helper!(
        "findIndexSliceBytes",
        r#"func findIndexSliceBytes(xs []uint8, f func(uint8, int) bool) int {
	for i, x := range xs {
		if f(x, i) {
			return i
		}
	}
	return -1
}"#
    ),
    helper!(
        "everySlice",
        r#"func everySlice(xs []interface{}, f func(interface{}, int) bool) bool {
	for i, x := range xs {
		if !f(x, i) {
			return false
		}
	}
	return true
}"#
    ),
    helper!(
        "everySliceBytes",
        r#"func everySliceBytes(xs []uint8, f func(uint8, int) bool) bool {
	for i, x := range xs {
		if !f(x, i) {
			return false
		}
	}
	return true
}"#
    ),
    helper!(
        "someSlice",
        r#"func someSlice(xs []interface{}, f func(interface{}, int) bool) bool {
	for i, x := range xs {
		if f(x, i) {
			return true
		}
	}
	return false
}"#
    ),
    helper!(
        "someSliceBytes",
        r#"func someSliceBytes(xs []uint8, f func(uint8, int) bool) bool {
	for i, x := range xs {
		if f(x, i) {
			return true
		}
	}
	return false
}"#
    ),
    helper!(
        "forEachSlice",
        r#"func forEachSlice(xs []interface{}, f func(interface{}, int)) {
	for i, x := range xs {
		f(x, i)
	}
}"#
    ),
    helper!(
        "forEachSliceBytes",
        r#"func forEachSliceBytes(xs []uint8, f func(uint8, int)) {
	for i, x := range xs {
		f(x, i)
	}
}"#
    ),
    // Nil-coalescing and truthiness
    helper!(
        "firstNonNil",
        r#"func firstNonNil(a, b interface{}) interface{} {
	if a != nil {
		return a
	}
	return b
}"#
    ),
    helper!(
        "ifTruthy",
        r#"func ifTruthy(cond bool, a, b interface{}) interface{} {
	if cond {
		return a
	}
	return b
}"#
    ),
    // typeof-style checks
    helper!(
        "isTypeString",
        r#"func isTypeString(v interface{}) bool {
	_, ok := v.(string)
	return ok
}"#
    ),
    helper!(
        "isTypeBoolean",
        r#"func isTypeBoolean(v interface{}) bool {
	_, ok := v.(bool)
	return ok
}"#
    ),
    helper!(
        "isTypeNumber",
        r#"func isTypeNumber(v interface{}) bool {
	switch v.(type) {
	case int, int8, int16, int32, int64, uint, uint8, uint16, uint32, uint64, float32, float64:
		return true
	}
	return false
}"#
    ),
    helper!(
        "isTypeFunction",
        imports = ["reflect"],
        r#"func isTypeFunction(v interface{}) bool {
	return v != nil && reflect.TypeOf(v).Kind() == reflect.Func
}"#
    ),
    helper!(
        "isTypeObject",
        imports = ["reflect"],
        r#"func isTypeObject(v interface{}) bool {
	if v == nil {
		return false
	}
	switch reflect.TypeOf(v).Kind() {
	case reflect.Map, reflect.Slice, reflect.Ptr, reflect.Struct:
		return true
	}
	return false
}"#
    ),
    helper!(
        "isTypeUndefined",
        r#"func isTypeUndefined(v interface{}) bool {
	return v == nil
}"#
    ),
    // 64-bit arithmetic as high/low word pairs
    helper!(
        "HL64",
        r#"type HL64 struct {
	Hi uint32
	Lo uint32
}"#
    ),
    helper!(
        "hl64",
        deps = ["HL64"],
        r#"func hl64(hi, lo uint32) HL64 {
	return HL64{Hi: hi, Lo: lo}
}"#
    ),
    helper!(
        "add64_HL",
        deps = ["HL64"],
        r#"func add64_HL(a, b HL64) HL64 {
	lo := uint64(a.Lo) + uint64(b.Lo)
	hi := uint64(a.Hi) + uint64(b.Hi) + lo>>32
	return HL64{Hi: uint32(hi), Lo: uint32(lo)}
}"#
    ),
    helper!(
        "sub64_HL",
        deps = ["HL64"],
        r#"func sub64_HL(a, b HL64) HL64 {
	v := (uint64(a.Hi)<<32 | uint64(a.Lo)) - (uint64(b.Hi)<<32 | uint64(b.Lo))
	return HL64{Hi: uint32(v >> 32), Lo: uint32(v)}
}"#
    ),
    helper!(
        "xor64_HL",
        deps = ["HL64"],
        r#"func xor64_HL(a, b HL64) HL64 {
	return HL64{Hi: a.Hi ^ b.Hi, Lo: a.Lo ^ b.Lo}
}"#
    ),
    helper!(
        "and64_HL",
        deps = ["HL64"],
        r#"func and64_HL(a, b HL64) HL64 {
	return HL64{Hi: a.Hi & b.Hi, Lo: a.Lo & b.Lo}
}"#
    ),
    helper!(
        "or64_HL",
        deps = ["HL64"],
        r#"func or64_HL(a, b HL64) HL64 {
	return HL64{Hi: a.Hi | b.Hi, Lo: a.Lo | b.Lo}
}"#
    ),
    helper!(
        "not64_HL",
        deps = ["HL64"],
        r#"func not64_HL(a HL64) HL64 {
	return HL64{Hi: ^a.Hi, Lo: ^a.Lo}
}"#
    ),
    helper!(
        "shl64_HL",
        deps = ["HL64"],
        r#"func shl64_HL(a HL64, n uint) HL64 {
	if n >= 64 {
		return HL64{}
	}
	v := (uint64(a.Hi)<<32 | uint64(a.Lo)) << n
	return HL64{Hi: uint32(v >> 32), Lo: uint32(v)}
}"#
    ),
    helper!(
        "shr64_HL",
        deps = ["HL64"],
        r#"func shr64_HL(a HL64, n uint) HL64 {
	if n >= 64 {
		return HL64{}
	}
	v := (uint64(a.Hi)<<32 | uint64(a.Lo)) >> n
	return HL64{Hi: uint32(v >> 32), Lo: uint32(v)}
}"#
    ),
    helper!(
        "rotL64_HL",
        deps = ["HL64"],
        imports = ["math/bits"],
        r#"func rotL64_HL(a HL64, n uint) HL64 {
	v := bits.RotateLeft64(uint64(a.Hi)<<32|uint64(a.Lo), int(n))
	return HL64{Hi: uint32(v >> 32), Lo: uint32(v)}
}"#
    ),
    helper!(
        "rotR64_HL",
        deps = ["HL64"],
        imports = ["math/bits"],
        r#"func rotR64_HL(a HL64, n uint) HL64 {
	v := bits.RotateLeft64(uint64(a.Hi)<<32|uint64(a.Lo), -int(n))
	return HL64{Hi: uint32(v >> 32), Lo: uint32(v)}
}"#
    ),
    // Integer powers
    helper!(
        "powInt",
        r#"func powInt(base, exp int) int {
	result := 1
	for i := 0; i < exp; i++ {
		result *= base
	}
	return result
}"#
    ),
    helper!(
        "powUint32",
        r#"func powUint32(base uint32, exp int) uint32 {
	var result uint32 = 1
	for i := 0; i < exp; i++ {
		result *= base
	}
	return result
}"#
    ),
    helper!(
        "constantTimeCompare",
        imports = ["crypto/subtle"],
        r#"func constantTimeCompare(a, b []uint8) bool {
	return subtle.ConstantTimeCompare(a, b) == 1
}"#
    ),
    helper!(
        "popcount",
        imports = ["math/bits"],
        r#"func popcount(v uint32) int {
	return bits.OnesCount32(v)
}"#
    ),
    helper!(
        "ParseInt",
        imports = ["strconv", "strings"],
        r#"func ParseInt(s string, base int) int64 {
	v, err := strconv.ParseInt(strings.TrimSpace(s), base, 64)
	if err != nil {
		return 0
	}
	return v
}"#
    ),
    helper!(
        "joinSlice",
        imports = ["fmt", "strings"],
        r#"func joinSlice(xs []interface{}, sep string) string {
	parts := make([]string, len(xs))
	for i, x := range xs {
		parts[i] = fmt.Sprintf("%v", x)
	}
	return strings.Join(parts, sep)
}"#
    ),
    helper!(
        "spliceSlice",
        r#"func spliceSlice(xs []interface{}, start, deleteCount int, items ...interface{}) []interface{} {
	if start < 0 {
		start = len(xs) + start
	}
	if start > len(xs) {
		start = len(xs)
	}
	end := start + deleteCount
	if end > len(xs) {
		end = len(xs)
	}
	out := append([]interface{}{}, xs[:start]...)
	out = append(out, items...)
	return append(out, xs[end:]...)
}"#
    ),
    helper!(
        "doubleToBytes",
        imports = ["encoding/binary", "math"],
        r#"func doubleToBytes(f float64) []uint8 {
	out := make([]uint8, 8)
	binary.LittleEndian.PutUint64(out, math.Float64bits(f))
	return out
}"#
    ),
    helper!(
        "uint32SliceToBytes",
        r#"func uint32SliceToBytes(xs []uint32) []uint8 {
	out := make([]uint8, 0, len(xs)*4)
	for _, x := range xs {
		out = append(out, uint8(x>>24), uint8(x>>16), uint8(x>>8), uint8(x))
	}
	return out
}"#
    ),
    helper!(
        "bytesToUint32Slice",
        deps = ["pack32BESlice"],
        r#"func bytesToUint32Slice(bs []uint8) []uint32 {
	out := make([]uint32, 0, (len(bs)+3)/4)
	for i := 0; i+3 < len(bs); i += 4 {
		out = append(out, pack32BESlice(bs[i:i+4]))
	}
	return out
}"#
    ),
    helper!(
        "xorArrays",
        r#"func xorArrays(a, b []uint8) []uint8 {
	n := len(a)
	if len(b) < n {
		n = len(b)
	}
	out := make([]uint8, n)
	for i := 0; i < n; i++ {
		out[i] = a[i] ^ b[i]
	}
	return out
}"#
    ),
];

/// Replacement body for `constantTimeCompare` when standard-library crypto
/// helpers are disabled.
const CONSTANT_TIME_COMPARE_INLINE: HelperDef = HelperDef {
    name: "constantTimeCompare",
    deps: &[],
    imports: &[],
    source: r#"func constantTimeCompare(a, b []uint8) bool {
	if len(a) != len(b) {
		return false
	}
	var d uint8
	for i := range a {
		d |= a[i] ^ b[i]
	}
	return d == 0
}"#,
};

/// Looks a helper up by name.
pub fn lookup(name: &str) -> Option<&'static HelperDef> {
    HELPERS.iter().find(|helper| helper.name == name)
}

/// True when `name` is a registered helper.
pub fn is_helper(name: &str) -> bool {
    lookup(name).is_some()
}

/// Computes the transitive closure of the selected helper names and returns
/// the definitions to emit, in registry order.
pub fn resolve(selected: &IndexSet<String>, use_crypto: bool) -> Vec<&'static HelperDef> {
    let mut closed: IndexSet<&'static str> = IndexSet::new();
    let mut queue: Vec<&str> = selected.iter().map(String::as_str).collect();
    while let Some(name) = queue.pop() {
        let Some(helper) = lookup(name) else { continue };
        if closed.insert(helper.name) {
            queue.extend(helper.deps.iter().copied());
        }
    }

    HELPERS
        .iter()
        .filter(|helper| closed.contains(helper.name))
        .map(|helper| {
            if helper.name == "constantTimeCompare" && !use_crypto {
                &CONSTANT_TIME_COMPARE_INLINE
            } else {
                helper
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use indexmap::IndexSet;
    use pretty_assertions::assert_eq;

    use super::{lookup, resolve, HELPERS};

    fn selection(names: &[&str]) -> IndexSet<String> {
        names.iter().map(|name| name.to_string()).collect()
    }

    #[test]
    fn test_every_dep_exists() {
        for helper in HELPERS {
            for dep in helper.deps {
                assert!(lookup(dep).is_some(), "{} depends on missing {dep}", helper.name);
            }
        }
    }

    #[test]
    fn test_names_are_unique() {
        let mut seen = IndexSet::new();
        for helper in HELPERS {
            assert!(seen.insert(helper.name), "duplicate helper {}", helper.name);
        }
    }

    #[test]
    fn test_min_max_cover_every_integer_width() {
        for width in [
            "Int", "Int8", "Int16", "Int32", "Int64", "Uint", "Uint8", "Uint16", "Uint32",
            "Uint64",
        ] {
            assert!(lookup(&format!("min{width}")).is_some(), "missing min{width}");
            assert!(lookup(&format!("max{width}")).is_some(), "missing max{width}");
        }
    }

    #[test]
    fn test_closure_pulls_dependencies() {
        let resolved = resolve(&selection(&["containsSlice"]), true);
        let names: Vec<&str> = resolved.iter().map(|helper| helper.name).collect();
        assert!(names.contains(&"indexOfSlice"));
        assert!(names.contains(&"asUint64"));
        assert!(names.contains(&"containsSlice"));
    }

    #[test]
    fn test_emission_follows_registry_order() {
        let resolved = resolve(&selection(&["containsSlice", "mustHexDecode"]), true);
        let names: Vec<&str> = resolved.iter().map(|helper| helper.name).collect();
        // mustHexDecode is registered before the contains family.
        let hex = names.iter().position(|name| *name == "mustHexDecode").unwrap();
        let contains = names.iter().position(|name| *name == "containsSlice").unwrap();
        assert!(hex < contains);
    }

    #[test]
    fn test_use_crypto_swaps_constant_time_compare() {
        let with_subtle = resolve(&selection(&["constantTimeCompare"]), true);
        assert!(with_subtle[0].source.contains("subtle.ConstantTimeCompare"));
        let inline = resolve(&selection(&["constantTimeCompare"]), false);
        assert!(inline[0].source.contains("d |= a[i] ^ b[i]"));
        assert_eq!(inline[0].name, "constantTimeCompare");
    }
}
