// build.rs
fn main() {
    #[cfg(windows)]
    {
        let mut res = winres::WindowsResource::new();
        res.set("FileDescription", "RoyaleAPI Deck Report");
        res.set("ProductName", "ra_scrape");
        if let Err(e) = res.compile() {
            println!("cargo:warning=winres: {e}");
        }
    }
}
