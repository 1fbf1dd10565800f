pub const ASCII: &str = r#"
          (    (    (
          )    )    )
         |~|  |~|  |~|
       __|_|__|_|__|_|__
      |~~~~~~~~~~~~~~~~~|
      |  *   *   *   *  |
    __|_________________|__
   |~~~~~~~~~~~~~~~~~~~~~~~|
   |  o   o   o   o   o    |
   |_______________________|
"#;
