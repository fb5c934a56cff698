#[cfg(test)]
mod tests {
    use hyper::HeaderMap;
    use crate::middleware::add_image_headers;

    #[test]
    fn test_add_image_headers() {
        let mut headers = HeaderMap::new();
        add_image_headers(&mut headers);

        assert_eq!(
            headers.get("cache-control").unwrap(),
            "public, max-age=3600"
        );
        assert_eq!(
            headers.get("access-control-allow-origin").unwrap(),
            "*"
        );
        assert_eq!(
            headers.get("x-content-type-options").unwrap(),
            "nosniff"
        );
    }
}
